// HTTP API: voice endpoint, announcements and dashboard state

mod announcement;
mod dashboard;
mod error;
mod voice;

pub use error::ApiError;

use crate::announcement::AnnouncementSlot;
use crate::config::EcoNudgeConfig;
use crate::dashboard::DashboardStore;
use crate::voice::IntentDispatcher;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub announcements: Arc<AnnouncementSlot>,
    pub dashboard: Arc<DashboardStore>,
    pub dispatcher: IntentDispatcher,
    pub body_size_limit_bytes: usize,
}

impl AppState {
    /// Fresh state holders seeded from config.
    pub fn new(config: &EcoNudgeConfig) -> Self {
        let announcements = Arc::new(AnnouncementSlot::new());
        let dashboard = Arc::new(DashboardStore::new(config.dashboard.clone()));
        let dispatcher = IntentDispatcher::new(Arc::clone(&announcements), Arc::clone(&dashboard));

        Self {
            announcements,
            dashboard,
            dispatcher,
            body_size_limit_bytes: config.api.body_size_limit_bytes,
        }
    }

    /// Reject bodies above the configured limit before parsing them.
    pub(crate) fn check_body_size(&self, len: usize) -> Result<(), ApiError> {
        if len > self.body_size_limit_bytes {
            return Err(ApiError::PayloadTooLarge);
        }
        Ok(())
    }
}

/// Create API router
///
/// - `POST /api/alexa` - voice request
/// - `PUT /api/alexa` - publish announcement
/// - `PATCH /api/alexa` - patch dashboard state
/// - `GET /api/alexa` - dashboard state
/// - `POST /api/alexa/announce` - publish announcement (test panel)
/// - `GET /api/alexa/announcement` - pending announcement, not consumed
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/alexa",
            get(dashboard::get_state)
                .post(voice::handle_voice_request)
                .put(announcement::queue_announcement)
                .patch(dashboard::patch_state),
        )
        .route("/api/alexa/announce", post(announcement::announce))
        .route("/api/alexa/announcement", get(announcement::peek_announcement))
        .with_state(Arc::new(state))
}

/// CORS layer for the dashboard UI. An empty list (or "*") allows any origin.
pub fn cors_layer(allow_origins: &[String]) -> CorsLayer {
    let origin = if allow_origins.is_empty() || allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allow_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
