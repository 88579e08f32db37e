//! Telegram webhook route

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use super::SECRET_HEADER;
use crate::infrastructure::state::AppState;
use crate::infrastructure::telegram::Update;

/// Accept an update pushed by Telegram.
///
/// Answers 200 immediately; the update is handled in its own task so a slow
/// narration never makes Telegram redeliver.
pub async fn receive_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    if let Some(expected) = &state.config.webhook_secret {
        let provided = headers
            .get(SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::warn!("Webhook update {} rejected: bad secret", update.update_id);
            return StatusCode::UNAUTHORIZED;
        }
    }

    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.handle_update(update).await;
    });

    StatusCode::OK
}
