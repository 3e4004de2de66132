use redis::AsyncCommands;
use redis::Client;

use crate::{
    db::profile_store::{decode_profile, encode_profile, ProfileKey, ProfileStore},
    error::AppResult,
    models::TasteVector,
};

/// Creates a Redis client for profile storage
///
/// Opening a client does not connect; connection errors surface on first use.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed profile store
///
/// The profile is written with a plain `SET`: it never expires and is only
/// ever overwritten.
#[derive(Clone)]
pub struct RedisProfileStore {
    redis_client: Client,
    key: ProfileKey,
}

impl RedisProfileStore {
    pub fn new(redis_client: Client, key: ProfileKey) -> Self {
        Self { redis_client, key }
    }
}

#[async_trait::async_trait]
impl ProfileStore for RedisProfileStore {
    async fn load(&self) -> AppResult<Option<TasteVector>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let stored: Option<String> = conn.get(self.key.to_string()).await.map_err(|e| {
            tracing::warn!(error = %e, key = %self.key, "Redis get failed");
            e
        })?;

        match stored {
            Some(json) => {
                let profile = decode_profile(&json)?;
                tracing::debug!(key = %self.key, "Loaded taste profile");
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, profile: &TasteVector) -> AppResult<()> {
        let json = encode_profile(profile)?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let _: () = conn.set(self.key.to_string(), json).await.map_err(|e| {
            tracing::warn!(error = %e, key = %self.key, "Redis set failed");
            e
        })?;

        tracing::debug!(key = %self.key, "Saved taste profile");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
