use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::analyzer::prompt;
use crate::stats::format::title_case;
use crate::AppState;

#[derive(Deserialize)]
pub struct CompareQuery {
    /// Optional emphasis ("power", "obp", ...) appended to the comparison.
    pub stat_focus: Option<String>,
}

/// GET /player/{player1}/{player2}
///
/// Head-to-head comparison of two players with an AI narrative verdict.
pub async fn compare_players(
    State(state): State<AppState>,
    Path((player1, player2)): Path<(String, String)>,
    Query(params): Query<CompareQuery>,
) -> impl IntoResponse {
    let Some(first) = state.stats.get_player_data(&player1, None).await else {
        return not_found(&player1);
    };
    let Some(second) = state.stats.get_player_data(&player2, None).await else {
        return not_found(&player2);
    };

    let comparison = prompt::comparison_block(
        &player1,
        &first,
        &player2,
        &second,
        params.stat_focus.as_deref(),
    );

    let label = format!("{} vs {}", title_case(&player1), title_case(&player2));
    let analysis = state
        .analyzer
        .analyze(&label, &json!({ "comparison_data": comparison }))
        .await;

    (
        StatusCode::OK,
        Json(json!({
            "comparison": comparison,
            "analysis": analysis,
            "first_player_info": first.player_info,
            "second_player_info": second.player_info,
            "data_source": "MLB Stats API",
            "comparison_timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

fn not_found(name: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!("Player '{}' not found", title_case(name)),
        })),
    )
}
