use std::{sync::Arc, time::Duration};

use tracing_subscriber::EnvFilter;

use dinefind_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        gemini::GeminiClient,
        places::{GooglePlacesClient, PlacesDirectory},
        recommendation::RecommendationEngine,
    },
    store::{create_redis_client, ProfileStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let store = ProfileStore::new(redis_client);

    let directory = Arc::new(GooglePlacesClient::new(
        config.places_api_key.clone(),
        config.places_api_url.clone(),
    ));
    let model = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));

    let directory: Arc<dyn PlacesDirectory> = directory;
    let engine = RecommendationEngine::new(
        directory.clone(),
        model,
        config.search_radius_m,
        Duration::from_millis(config.detail_fetch_delay_ms),
    );

    let state = Arc::new(AppState {
        engine,
        directory,
        store,
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "dinefind-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
