pub mod profile_store;
pub mod redis;

pub use profile_store::{
    InMemoryProfileStore, ProfileKey, ProfileStore, DEFAULT_PROFILE_KEY,
};
pub use self::redis::create_redis_client;
pub use self::redis::RedisProfileStore;

#[cfg(test)]
pub use profile_store::MockProfileStore;
