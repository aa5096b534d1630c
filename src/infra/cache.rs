//! Redis cache implementation.
//!
//! Backs the session store when `SESSION_DRIVER=redis`. Values are stored
//! as JSON strings with a TTL.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, CACHE_PREFIX_SESSION};
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to the Redis instance named by `REDIS_URL`.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with custom TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    /// Round-trip a PING, used by the health check.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    // =========================================================================
    // Session Cache Operations
    // =========================================================================

    /// Store session data.
    pub async fn set_session<T: Serialize>(
        &self,
        session_id: &str,
        data: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        self.set_with_ttl(&session_key(session_id), data, ttl_seconds)
            .await
    }

    /// Get session data.
    pub async fn get_session<T: DeserializeOwned>(&self, session_id: &str) -> AppResult<Option<T>> {
        self.get(&session_key(session_id)).await
    }

    /// Delete session.
    pub async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        self.delete(&session_key(session_id)).await
    }
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", CACHE_PREFIX_SESSION, session_id)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
