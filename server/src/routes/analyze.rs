use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::stats::format::title_case;
use crate::AppState;

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    /// Season year; defaults to the current season.
    pub season: Option<i32>,
    /// Include the recent-performance line in the payload (default true).
    pub include_recent: Option<bool>,
}

/// GET /analyze/{player_name}
///
/// Fetches formatted stats for the player (cache permitting) and returns
/// them with an AI-generated narrative analysis.
pub async fn analyze_player(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
    Query(params): Query<AnalyzeQuery>,
) -> impl IntoResponse {
    let name = player_name.trim();
    if name.len() < 2 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Player name must be at least 2 characters" })),
        );
    }

    let Some(data) = state.stats.get_player_data(name, params.season).await else {
        let suggestions: Vec<String> = state
            .stats
            .search_players(name, 5)
            .await
            .into_iter()
            .map(|p| p.full_name)
            .collect();
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("Player '{}' not found", title_case(name)),
                "suggestions": suggestions,
            })),
        );
    };

    let record = match serde_json::to_value(&data) {
        Ok(record) => record,
        Err(e) => {
            error!("Failed to serialize player data for {name}: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            );
        }
    };

    let display_name = title_case(name);
    let analysis = state.analyzer.analyze(&display_name, &record).await;

    let mut payload = json!({
        "player": display_name,
        "analysis": analysis,
        "player_info": data.player_info,
        "data_source": "MLB Stats API",
        "last_updated": data.last_updated,
        "query_timestamp": Utc::now().to_rfc3339(),
    });
    if params.include_recent.unwrap_or(true) {
        payload["recent_performance"] = json!(data.recent_games);
    }

    (StatusCode::OK, Json(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, OpenAiClient};
    use crate::stats::{MlbClient, StatsService, TtlCache};
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_short_player_name_rejected() {
        let state = AppState {
            stats: Arc::new(StatsService::new(
                MlbClient::new("http://127.0.0.1:9"),
                Box::new(TtlCache::new(chrono::Duration::minutes(30))),
            )),
            analyzer: Arc::new(Analyzer::new(OpenAiClient::new("", "gpt-4o"))),
        };
        let app = Router::new()
            .route("/analyze/:player_name", get(analyze_player))
            .with_state(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/analyze/x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
