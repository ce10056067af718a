use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Coordinate, RecommendationResult, UserPreferences},
    routes::AppState,
    services::recommendation::DiscoveryState,
    store::StoreKey,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverRequest {
    /// Device coordinate; absence means the device had no fix
    #[serde(default)]
    pub location: Option<Coordinate>,
    /// Overrides the stored preference record when present
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

/// Serialized snapshot of the discovery state machine
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStateResponse {
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RecommendationResult>,
}

impl DiscoveryStateResponse {
    fn phase_only(phase: &'static str) -> Self {
        Self {
            phase,
            stage: None,
            message: None,
            result: None,
        }
    }
}

impl From<DiscoveryState> for DiscoveryStateResponse {
    fn from(state: DiscoveryState) -> Self {
        match state {
            DiscoveryState::Idle => Self::phase_only("idle"),
            DiscoveryState::Locating => Self::phase_only("locating"),
            DiscoveryState::Aggregating => Self::phase_only("aggregating"),
            DiscoveryState::Consulting => Self::phase_only("consulting"),
            DiscoveryState::Parsing => Self::phase_only("parsing"),
            DiscoveryState::Done(result) => Self {
                phase: "done",
                stage: None,
                message: None,
                result: Some(result),
            },
            DiscoveryState::Error { stage, message } => Self {
                phase: "error",
                stage: Some(stage.label()),
                message: Some(message),
                result: None,
            },
        }
    }
}

/// Runs one discovery: locate → aggregate → consult → parse
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<DiscoverRequest>,
) -> AppResult<Json<RecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        has_location = request.location.is_some(),
        inline_preferences = request.preferences.is_some(),
        "Processing discovery request"
    );

    // Stored preferences back the request when none are inline; an absent
    // record means "no constraints"
    let preferences = match request.preferences {
        Some(preferences) => preferences,
        None => state
            .store
            .get::<UserPreferences>(StoreKey::Preferences)
            .await?
            .unwrap_or_default(),
    };

    let result = state.engine.discover(request.location, &preferences).await?;

    tracing::info!(
        request_id = %request_id,
        top_pick = %result.top_pick.restaurant.place_id,
        alternatives = result.alternatives.len(),
        "Discovery completed"
    );

    Ok(Json(result))
}

/// Reports the current discovery state
pub async fn discovery_state(State(state): State<Arc<AppState>>) -> Json<DiscoveryStateResponse> {
    Json(state.engine.state().await.into())
}

/// Returns the state machine to idle, discarding in-flight state
pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.engine.reset().await;
    StatusCode::NO_CONTENT
}
