use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::AppState;

/// GET /team/{team_name}/roster
///
/// Active roster for a team matched by name.
pub async fn team_roster(
    State(state): State<AppState>,
    Path(team_name): Path<String>,
) -> impl IntoResponse {
    let Some((team, roster)) = state.stats.team_roster(&team_name).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("Team '{}' not found", team_name.trim()),
            })),
        );
    };

    let roster_size = roster.len();

    (
        StatusCode::OK,
        Json(json!({
            "team": team.name,
            "roster": roster,
            "roster_size": roster_size,
            "data_source": "MLB Stats API",
            "retrieved_at": Utc::now().to_rfc3339(),
        })),
    )
}
