pub mod analyze;
pub mod ask;
pub mod compare;
pub mod health;
pub mod roster;
pub mod search;

use axum::Json;
use serde_json::{json, Value};

/// GET /
///
/// Static API description payload.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Line Drive AI",
        "description": "Analyze MLB player performance",
        "endpoints": {
            "analyze": "/analyze/{player_name}",
            "search": "/search/{query}",
            "compare": "/player/{player1}/{player2}",
            "roster": "/team/{team_name}/roster",
            "ask": "/ask?question=...",
            "health": "/health"
        }
    }))
}
