use std::sync::Arc;

use crate::{
    db::{InMemoryProfileStore, ProfileStore},
    error::AppResult,
    services::{ProfileSession, RecipeCatalog},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read-only recipe catalog
    pub catalog: Arc<RecipeCatalog>,
    /// The single owner of the taste profile; locks internally
    pub session: Arc<ProfileSession>,
}

impl AppState {
    /// Opens the profile session against `store`
    pub async fn new(catalog: RecipeCatalog, store: Arc<dyn ProfileStore>) -> Self {
        let session = ProfileSession::open(store).await;
        Self {
            catalog: Arc::new(catalog),
            session: Arc::new(session),
        }
    }

    /// Bundled catalog with a process-local profile store
    pub async fn in_memory() -> AppResult<Self> {
        let catalog = RecipeCatalog::bundled()?;
        Ok(Self::new(catalog, Arc::new(InMemoryProfileStore::default())).await)
    }
}
