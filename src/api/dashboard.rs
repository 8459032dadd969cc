use crate::api::{ApiError, AppState};
use crate::dashboard::{DashboardPatch, DashboardState};
use axum::{body::Bytes, extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
pub(crate) struct StateResponse {
    success: bool,
    data: DashboardState,
}

#[derive(Serialize)]
pub(crate) struct PatchResponse {
    success: bool,
    message: &'static str,
    #[serde(rename = "currentState")]
    current_state: DashboardState,
}

/// GET /api/alexa - Current dashboard snapshot
pub(crate) async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        success: true,
        data: state.dashboard.read(),
    })
}

/// PATCH /api/alexa - Merge supplied fields into the dashboard state
///
/// Unknown keys are ignored; a known key with the wrong type is a 400.
pub(crate) async fn patch_state(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PatchResponse>, ApiError> {
    state.check_body_size(body.len())?;

    let patch: DashboardPatch = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected dashboard patch");
        ApiError::ValidationError(e.to_string())
    })?;

    let current_state = state.dashboard.patch(&patch);

    Ok(Json(PatchResponse {
        success: true,
        message: "Dashboard state updated successfully",
        current_state,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EcoNudgeConfig;

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&EcoNudgeConfig::default()))
    }

    #[tokio::test]
    async fn test_get_state_returns_defaults() {
        let state = create_test_state();

        let Json(response) = get_state(State(state)).await;

        assert!(response.success);
        assert_eq!(response.data.temperature, 21.0);
        assert_eq!(response.data.tree_health, 10);
    }

    #[tokio::test]
    async fn test_patch_state_merges_fields() {
        let state = create_test_state();
        let body = Bytes::from_static(br#"{"temperature": 22, "heatingOn": false}"#);

        let Json(response) = patch_state(State(state.clone()), body).await.unwrap();

        assert_eq!(response.current_state.temperature, 22.0);
        assert!(!response.current_state.heating_on);
        assert_eq!(state.dashboard.read(), response.current_state);
    }

    #[tokio::test]
    async fn test_patch_state_rejects_non_object() {
        let state = create_test_state();
        let body = Bytes::from_static(b"[1, 2, 3]");

        let result = patch_state(State(state), body).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_patch_state_enforces_body_limit() {
        let mut config = EcoNudgeConfig::default();
        config.api.body_size_limit_bytes = 8;
        let state = Arc::new(AppState::new(&config));
        let body = Bytes::from_static(br#"{"temperature": 22}"#);

        let result = patch_state(State(state.clone()), body).await;
        assert!(matches!(result, Err(ApiError::PayloadTooLarge)));
        assert_eq!(state.dashboard.read().temperature, 21.0);
    }
}
