use std::fmt::Display;

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

/// Fixed keys for the per-user records the mobile client reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Preferences,
    Favorites,
    History,
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Preferences => write!(f, "user_preferences"),
            StoreKey::Favorites => write!(f, "restaurant_favorites"),
            StoreKey::History => write!(f, "restaurant_history"),
        }
    }
}

/// Creates a Redis client for the profile store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key-value store for serialized preference, favorites and history records
///
/// Records are durable user data, not cache fills: writes are awaited and
/// stored without a TTL.
#[derive(Clone)]
pub struct ProfileStore {
    redis_client: Client,
}

impl ProfileStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    /// Retrieves and deserializes the record under `key`, if present
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: StoreKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(format!("{}", key)).await?;

        match stored {
            Some(json) => {
                let record = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Store deserialization error: {}", e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Serializes and stores a record under `key`
    pub async fn set<T: serde::Serialize>(&self, key: StoreKey, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Store serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(format!("{}", key), json).await?;

        tracing::debug!(key = %key, "Stored record");

        Ok(())
    }

    /// Removes the record under `key`
    pub async fn clear(&self, key: StoreKey) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(format!("{}", key)).await?;

        tracing::debug!(key = %key, "Cleared record");

        Ok(())
    }
}
