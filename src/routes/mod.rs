use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::services::places::PlacesDirectory;
use crate::services::recommendation::RecommendationEngine;
use crate::store::ProfileStore;

pub mod discover;
pub mod profile;

/// Shared application state
pub struct AppState {
    pub engine: RecommendationEngine,
    pub directory: Arc<dyn PlacesDirectory>,
    pub store: ProfileStore,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Discovery pipeline
        .route("/discover", post(discover::discover))
        .route("/discover/state", get(discover::discovery_state))
        .route("/discover/reset", post(discover::reset))
        // Stored preferences
        .route(
            "/preferences",
            get(profile::get_preferences)
                .put(profile::put_preferences)
                .delete(profile::clear_preferences),
        )
        // Favorites
        .route(
            "/favorites",
            get(profile::get_favorites)
                .post(profile::add_favorite)
                .delete(profile::clear_favorites),
        )
        .route("/favorites/:place_id", delete(profile::remove_favorite))
        // Photo rendering
        .route("/photos/:photo_reference", get(profile::photo_redirect))
        // History
        .route(
            "/history",
            get(profile::get_history)
                .post(profile::add_history)
                .delete(profile::clear_history),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
