use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tastebuddy_api::{
    api::{create_router, AppState},
    config::{Config, ProfileStoreKind},
    db::{create_redis_client, InMemoryProfileStore, ProfileKey, ProfileStore, RedisProfileStore},
    services::RecipeCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tastebuddy_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => RecipeCatalog::from_path(path)?,
        None => RecipeCatalog::bundled()?,
    };
    tracing::info!(recipe_count = catalog.len(), "Recipe catalog ready");

    let key = ProfileKey::new(config.profile_key.clone());
    let store: Arc<dyn ProfileStore> = match config.profile_store {
        ProfileStoreKind::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            Arc::new(RedisProfileStore::new(client, key))
        }
        ProfileStoreKind::Memory => Arc::new(InMemoryProfileStore::new(key)),
    };
    tracing::info!(store = store.name(), "Profile store configured");

    let state = AppState::new(catalog, store).await;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
