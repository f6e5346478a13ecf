use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub limit: Option<usize>,
}

/// GET /search/{query}
///
/// Free-text player search, for disambiguation before an /analyze call.
pub async fn search_players(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    let query = query.trim();
    if query.len() < 2 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Search query must be at least 2 characters" })),
        );
    }

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let results = state.stats.search_players(query, limit).await;
    let total_found = results.len();

    (
        StatusCode::OK,
        Json(json!({
            "query": query,
            "results": results,
            "total_found": total_found,
            "search_timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, OpenAiClient};
    use crate::stats::{MlbClient, StatsService, TtlCache};
    use crate::AppState;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;

    // State wired to unreachable endpoints: validation failures never reach
    // upstream, and valid queries degrade to empty results.
    fn offline_state() -> AppState {
        AppState {
            stats: Arc::new(StatsService::new(
                MlbClient::new("http://127.0.0.1:9"),
                Box::new(TtlCache::new(chrono::Duration::minutes(30))),
            )),
            analyzer: Arc::new(Analyzer::new(OpenAiClient::new("", "gpt-4o"))),
        }
    }

    #[tokio::test]
    async fn test_one_char_effective_query_rejected() {
        let app = Router::new()
            .route("/search/:query", get(search_players))
            .with_state(offline_state());

        // "%20a" trims down to a single character
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/search/%20a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_two_char_query_accepted() {
        let app = Router::new()
            .route("/search/:query", get(search_players))
            .with_state(offline_state());

        // Upstream is unreachable, so the search degrades to empty results,
        // but the query itself is valid.
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/search/ab")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
