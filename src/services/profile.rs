use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::{
    db::ProfileStore,
    error::AppResult,
    models::TasteVector,
    services::preference::ewma_update,
};

/// Result of a profile mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileUpdate {
    /// The new in-memory profile
    pub profile: TasteVector,
    /// Whether the store accepted the write
    pub persisted: bool,
}

/// Owner of the user's in-memory taste profile
///
/// Mutations are applied to memory under a short write lock, which is released
/// before the store is called; readers never wait on storage. A failed write
/// is logged and reported through [`ProfileUpdate::persisted`]; the in-memory
/// profile stays authoritative and nothing is retried.
pub struct ProfileSession {
    profile: RwLock<TasteVector>,
    store: Arc<dyn ProfileStore>,
    /// Serializes saves so the store always ends with the latest profile
    save_lock: Mutex<()>,
}

impl ProfileSession {
    /// Loads the stored profile, falling back to the default vector
    pub async fn open(store: Arc<dyn ProfileStore>) -> Self {
        let profile = match store.load().await {
            Ok(Some(profile)) => {
                tracing::info!(store = store.name(), "Restored taste profile");
                profile
            }
            Ok(None) => {
                tracing::info!(store = store.name(), "No stored taste profile, using default");
                TasteVector::default()
            }
            Err(e) => {
                tracing::warn!(
                    store = store.name(),
                    error = %e,
                    "Could not load taste profile, using default"
                );
                TasteVector::default()
            }
        };

        Self {
            profile: RwLock::new(profile),
            store,
            save_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the authoritative in-memory profile
    pub async fn current(&self) -> TasteVector {
        *self.profile.read().await
    }

    /// Overwrites the profile, e.g. with a quiz result
    pub async fn replace(&self, profile: TasteVector) -> ProfileUpdate {
        *self.profile.write().await = profile;
        let persisted = self.persist().await;
        ProfileUpdate { profile, persisted }
    }

    /// Pulls the profile toward a rated recipe
    ///
    /// An invalid rating is returned as an error and the profile is untouched.
    pub async fn record_feedback(
        &self,
        recipe: &TasteVector,
        rating: i64,
    ) -> AppResult<ProfileUpdate> {
        let updated = {
            let mut profile = self.profile.write().await;
            let updated = ewma_update(&profile, recipe, rating)?;
            *profile = updated;
            updated
        };
        let persisted = self.persist().await;
        Ok(ProfileUpdate {
            profile: updated,
            persisted,
        })
    }

    /// Writes the latest in-memory profile; called with no profile lock held
    async fn persist(&self) -> bool {
        let _serial = self.save_lock.lock().await;
        let latest = self.current().await;

        match self.store.save(&latest).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    store = self.store.name(),
                    error = %e,
                    "Failed to persist taste profile; keeping in-memory copy"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryProfileStore, MockProfileStore, ProfileKey};
    use crate::error::AppError;
    use mockall::predicate::eq;
    use std::time::Duration;

    const EPS: f64 = 1e-9;

    fn miso() -> TasteVector {
        TasteVector::clamped([0.1, 0.5, 0.2, 0.1, 0.85, 0.2, 0.7])
    }

    /// Store whose writes take a long time to complete
    struct SlowStore {
        inner: InMemoryProfileStore,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl ProfileStore for SlowStore {
        async fn load(&self) -> AppResult<Option<TasteVector>> {
            self.inner.load().await
        }

        async fn save(&self, profile: &TasteVector) -> AppResult<()> {
            tokio::time::sleep(self.delay).await;
            self.inner.save(profile).await
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn unavailable() -> AppError {
        AppError::StoreUnavailable("connection refused".to_string())
    }

    #[tokio::test]
    async fn test_open_without_stored_profile_uses_default() {
        let store = Arc::new(InMemoryProfileStore::default());
        let session = ProfileSession::open(store).await;
        assert_eq!(session.current().await, TasteVector::default());
    }

    #[tokio::test]
    async fn test_open_restores_stored_profile() {
        let stored = TasteVector::uniform(0.8);
        let store = Arc::new(InMemoryProfileStore::default());
        store.save(&stored).await.unwrap();

        let session = ProfileSession::open(store).await;
        assert_eq!(session.current().await, stored);
    }

    #[tokio::test]
    async fn test_open_with_corrupt_payload_uses_default() {
        let store = Arc::new(InMemoryProfileStore::with_payload(ProfileKey::default(), "[1,2,3]"));
        let session = ProfileSession::open(store).await;
        assert_eq!(session.current().await, TasteVector::default());
    }

    #[tokio::test]
    async fn test_open_with_unavailable_store_uses_default() {
        let mut store = MockProfileStore::new();
        store.expect_load().times(1).returning(|| Err(unavailable()));
        store.expect_name().return_const("mock");

        let session = ProfileSession::open(Arc::new(store)).await;
        assert_eq!(session.current().await, TasteVector::default());
    }

    #[tokio::test]
    async fn test_feedback_updates_memory_and_store() {
        let store = Arc::new(InMemoryProfileStore::default());
        let session = ProfileSession::open(store.clone()).await;

        let update = session.record_feedback(&miso(), 5).await.unwrap();
        assert!(update.persisted);

        let expected = [0.3, 0.5, 0.35, 0.3, 0.675, 0.35, 0.6];
        for (got, want) in session.current().await.components().iter().zip(expected) {
            assert!((got - want).abs() < EPS);
        }
        assert_eq!(store.load().await.unwrap(), Some(session.current().await));
    }

    #[tokio::test]
    async fn test_invalid_rating_leaves_profile_and_store_untouched() {
        let mut store = MockProfileStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_save().never();
        store.expect_name().return_const("mock");

        let session = ProfileSession::open(Arc::new(store)).await;
        for rating in [0, 6] {
            let err = session.record_feedback(&miso(), rating).await.unwrap_err();
            assert_eq!(err, AppError::InvalidRating(rating));
        }
        assert_eq!(session.current().await, TasteVector::default());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_in_memory_profile() {
        let mut store = MockProfileStore::new();
        store.expect_load().returning(|| Ok(None));
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(unavailable()));
        store.expect_name().return_const("mock");

        let session = ProfileSession::open(Arc::new(store)).await;
        let update = tokio_test::assert_ok!(session.record_feedback(&miso(), 5).await);

        assert!(!update.persisted);
        assert_eq!(update.profile, session.current().await);
        assert_ne!(session.current().await, TasteVector::default());
    }

    #[tokio::test]
    async fn test_replace_saves_exact_vector() {
        let quiz_result = TasteVector::clamped([0.2, 0.4, 0.6, 0.8, 1.0, 0.0, 0.5]);

        let mut store = MockProfileStore::new();
        store.expect_load().returning(|| Ok(None));
        store
            .expect_save()
            .with(eq(quiz_result))
            .times(1)
            .returning(|_| Ok(()));
        store.expect_name().return_const("mock");

        let session = ProfileSession::open(Arc::new(store)).await;
        let update = session.replace(quiz_result).await;

        assert!(update.persisted);
        assert_eq!(session.current().await, quiz_result);
    }

    #[tokio::test]
    async fn test_reads_do_not_wait_for_slow_save() {
        let store = Arc::new(SlowStore {
            inner: InMemoryProfileStore::default(),
            delay: Duration::from_secs(2),
        });
        let session = Arc::new(ProfileSession::open(store.clone()).await);

        let writer = {
            let session = session.clone();
            tokio::spawn(async move { session.record_feedback(&miso(), 5).await })
        };

        // The new profile becomes visible well before the save completes
        let seen = tokio::time::timeout(Duration::from_millis(500), async {
            loop {
                let current = session.current().await;
                if current != TasteVector::default() {
                    return current;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("reader blocked on storage latency");

        assert!((seen.components()[4] - 0.675).abs() < EPS);
        assert_eq!(store.inner.raw().await, None);

        let update = writer.await.unwrap().unwrap();
        assert!(update.persisted);
        assert_eq!(store.inner.load().await.unwrap(), Some(seen));
    }

    #[tokio::test]
    async fn test_concurrent_updates_leave_latest_profile_in_store() {
        let store = Arc::new(SlowStore {
            inner: InMemoryProfileStore::default(),
            delay: Duration::from_millis(50),
        });
        let session = Arc::new(ProfileSession::open(store.clone()).await);

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.replace(TasteVector::uniform(0.1)).await })
        };
        let second = {
            let session = session.clone();
            tokio::spawn(async move { session.replace(TasteVector::uniform(0.9)).await })
        };
        first.await.unwrap();
        second.await.unwrap();

        let latest = session.current().await;
        assert_eq!(store.inner.load().await.unwrap(), Some(latest));
    }
}
