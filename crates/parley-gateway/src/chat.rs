use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatAccepted {
    pub id: Uuid,
}

/// Accept a chat message and start its turn in the background.
///
/// Answers `202 Accepted` with the session id before the model is called.
/// A body that is not JSON, or lacks a non-empty string `message`, gets
/// `400 {"error":"missing message"}`.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(req)) if !req.message.is_empty() => req.message,
        Ok(_) => return missing_message(),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected chat request body");
            return missing_message();
        }
    };

    let id = state.streams.create();
    info!(session_id = %id, chars = message.chars().count(), "Chat accepted");
    state.pipeline.spawn(id, message);

    (StatusCode::ACCEPTED, Json(ChatAccepted { id })).into_response()
}

fn missing_message() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": "missing message"})),
    )
        .into_response()
}
