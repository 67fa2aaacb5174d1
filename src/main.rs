use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinescout::api::{create_router, AppState};
use cinescout::config::Config;
use cinescout::db::{create_redis_client, RedisStore};
use cinescout::services::identity::FirebaseIdentity;
use cinescout::services::providers::{ImageUrls, TmdbProvider};
use cinescout::services::PreferenceTracker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Durability layer and tracker state
    let redis_client = create_redis_client(&config.redis_url)?;
    let store = Arc::new(RedisStore::new(redis_client));
    let tracker = Arc::new(PreferenceTracker::restore(store).await?);

    // External collaborators
    let catalog = Arc::new(TmdbProvider::new(
        config.tmdb_api_token.clone(),
        config.tmdb_api_url.clone(),
    ));
    let identity = Arc::new(FirebaseIdentity::new(
        config.identity_api_key.clone(),
        config.identity_api_url.clone(),
    ));

    let images = ImageUrls::new(
        config.poster_base_url.clone(),
        config.backdrop_base_url.clone(),
    );

    let state = AppState::new(catalog, identity, tracker, images);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
