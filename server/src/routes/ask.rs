use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::analyzer::qa;
use crate::AppState;

#[derive(Deserialize)]
pub struct AskQuery {
    pub question: String,
}

/// GET /ask?question=...
///
/// Best-effort natural-language stat questions ("how many home runs does
/// aaron judge have?").
pub async fn ask_question(
    State(state): State<AppState>,
    Query(params): Query<AskQuery>,
) -> impl IntoResponse {
    let question = params.question.trim();
    if question.len() < 2 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Question must be at least 2 characters" })),
        );
    }

    let qa = qa::answer_question(question, &state.stats).await;

    (
        StatusCode::OK,
        Json(json!({
            "question": question,
            "answer": qa.answer,
            "players_found": qa.players,
            "answered_at": Utc::now().to_rfc3339(),
        })),
    )
}
