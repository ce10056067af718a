use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateRestaurant, SavedRestaurant, UserPreferences},
    routes::AppState,
    store::StoreKey,
};

// Preferences

pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<UserPreferences>> {
    let preferences = state
        .store
        .get::<UserPreferences>(StoreKey::Preferences)
        .await?
        .unwrap_or_default();
    Ok(Json(preferences))
}

pub async fn put_preferences(
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<UserPreferences>,
) -> AppResult<StatusCode> {
    state.store.set(StoreKey::Preferences, &preferences).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_preferences(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    state.store.clear(StoreKey::Preferences).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Favorites

pub async fn get_favorites(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<SavedRestaurant>>> {
    Ok(Json(load_list(&state, StoreKey::Favorites).await?))
}

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Json(restaurant): Json<CandidateRestaurant>,
) -> AppResult<StatusCode> {
    save_to_list(&state, StoreKey::Favorites, restaurant).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> AppResult<StatusCode> {
    let mut entries = load_list(&state, StoreKey::Favorites).await?;
    entries.retain(|entry| entry.restaurant.place_id != place_id);
    state.store.set(StoreKey::Favorites, &entries).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_favorites(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    state.store.clear(StoreKey::Favorites).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Photos

#[derive(Debug, Deserialize)]
pub struct PhotoParams {
    #[serde(default = "default_photo_width")]
    pub maxwidth: u32,
}

fn default_photo_width() -> u32 {
    400
}

/// Redirects to the directory's photo endpoint for a stored reference
pub async fn photo_redirect(
    State(state): State<Arc<AppState>>,
    Path(photo_reference): Path<String>,
    Query(params): Query<PhotoParams>,
) -> AppResult<Redirect> {
    // The photo endpoint accepts widths of 1 through 1600
    if params.maxwidth == 0 || params.maxwidth > 1600 {
        return Err(AppError::InvalidInput(
            "maxwidth must be between 1 and 1600".to_string(),
        ));
    }

    Ok(Redirect::temporary(
        &state.directory.photo_url(&photo_reference, params.maxwidth),
    ))
}

// History

pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<SavedRestaurant>>> {
    Ok(Json(load_list(&state, StoreKey::History).await?))
}

pub async fn add_history(
    State(state): State<Arc<AppState>>,
    Json(restaurant): Json<CandidateRestaurant>,
) -> AppResult<StatusCode> {
    save_to_list(&state, StoreKey::History, restaurant).await?;
    Ok(StatusCode::CREATED)
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    state.store.clear(StoreKey::History).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Helpers

async fn load_list(state: &AppState, key: StoreKey) -> AppResult<Vec<SavedRestaurant>> {
    Ok(state.store.get(key).await?.unwrap_or_default())
}

/// Prepends `restaurant` to the list under `key`; duplicates by identifier
/// are left untouched
async fn save_to_list(
    state: &AppState,
    key: StoreKey,
    restaurant: CandidateRestaurant,
) -> AppResult<()> {
    let mut entries = load_list(state, key).await?;

    if entries
        .iter()
        .any(|entry| entry.restaurant.place_id == restaurant.place_id)
    {
        return Ok(());
    }

    entries.insert(
        0,
        SavedRestaurant {
            restaurant,
            saved_at: Utc::now(),
        },
    );

    state.store.set(key, &entries).await
}
