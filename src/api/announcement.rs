use crate::announcement::Announcement;
use crate::api::{ApiError, AppState};
use axum::{body::Bytes, extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Announcement publish body
#[derive(Deserialize)]
pub(crate) struct AnnouncementRequest {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    category: String,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct QueuedResponse {
    success: bool,
    message: &'static str,
    details: &'static str,
    instructions: &'static str,
}

#[derive(Serialize)]
pub(crate) struct AnnounceResponse {
    success: bool,
    message: &'static str,
    data: Announcement,
}

#[derive(Serialize)]
pub(crate) struct PendingResponse {
    success: bool,
    data: Option<Announcement>,
}

/// Parse and store an announcement, replacing any unread one.
fn publish(state: &AppState, body: &Bytes) -> Result<Announcement, ApiError> {
    state.check_body_size(body.len())?;

    let request: AnnouncementRequest = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected announcement body");
        ApiError::ValidationError(e.to_string())
    })?;

    if request.message.trim().is_empty() {
        return Err(ApiError::ValidationError("message is required".to_string()));
    }

    info!(
        text = %request.message,
        category = %request.category,
        "Announcement received"
    );

    Ok(state
        .announcements
        .publish(request.message, request.category, request.detail))
}

/// PUT /api/alexa - Queue an announcement for the next voice session
pub(crate) async fn queue_announcement(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<QueuedResponse>, ApiError> {
    publish(&state, &body)?;

    Ok(Json(QueuedResponse {
        success: true,
        message: "Announcement queued successfully",
        details: "Your announcement is ready for Alexa testing",
        instructions: "Open the Alexa simulator and say 'Alexa, ask Eco Nudge if there are any updates' to hear your announcement",
    }))
}

/// POST /api/alexa/announce - Publish and echo the stored announcement
pub(crate) async fn announce(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnnounceResponse>, ApiError> {
    let data = publish(&state, &body)?;

    Ok(Json(AnnounceResponse {
        success: true,
        message: "Announcement processed successfully",
        data,
    }))
}

/// GET /api/alexa/announcement - Pending announcement without consuming it
pub(crate) async fn peek_announcement(State(state): State<Arc<AppState>>) -> Json<PendingResponse> {
    Json(PendingResponse {
        success: true,
        data: state.announcements.peek(),
    })
}
