use std::collections::HashMap;
use std::fmt::Display;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::TasteVector,
};

/// Key the single installation profile lives under
pub const DEFAULT_PROFILE_KEY: &str = "tasteProfile";

/// Storage key for a taste profile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey(String);

impl ProfileKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl Default for ProfileKey {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_KEY)
    }
}

impl Display for ProfileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persistence boundary for the user's taste profile
///
/// Implementations store the profile as a JSON array of 7 numbers. Writes
/// are last-write-wins per key.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the stored profile, or `None` if nothing has been saved yet
    async fn load(&self) -> AppResult<Option<TasteVector>>;

    /// Overwrites the stored profile
    async fn save(&self, profile: &TasteVector) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Serializes a profile into the persisted layout
pub fn encode_profile(profile: &TasteVector) -> AppResult<String> {
    serde_json::to_string(profile)
        .map_err(|e| AppError::Internal(format!("Profile serialization error: {}", e)))
}

/// Parses the persisted layout; anything other than 7 numbers counts as corrupt
pub fn decode_profile(raw: &str) -> AppResult<TasteVector> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::StoreUnavailable(format!("Corrupt profile payload: {}", e)))
}

/// Process-local profile store holding the same JSON layout as Redis
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    key: ProfileKey,
    entries: RwLock<HashMap<ProfileKey, String>>,
}

impl InMemoryProfileStore {
    pub fn new(key: ProfileKey) -> Self {
        Self {
            key,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Seeds the store with a raw payload, valid or not
    pub fn with_payload(key: ProfileKey, raw: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.clone(), raw.into());
        Self {
            key,
            entries: RwLock::new(entries),
        }
    }

    /// The raw stored payload, if any
    pub async fn raw(&self) -> Option<String> {
        self.entries.read().await.get(&self.key).cloned()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self) -> AppResult<Option<TasteVector>> {
        match self.entries.read().await.get(&self.key) {
            Some(raw) => decode_profile(raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: &TasteVector) -> AppResult<()> {
        let json = encode_profile(profile)?;
        self.entries.write().await.insert(self.key.clone(), json);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
