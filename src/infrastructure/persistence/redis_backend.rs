//! Redis-backed blob backend.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info};

use crate::domain::repositories::BlobBackend;
use crate::error::AppError;

/// Stores each blob under one Redis key.
///
/// Uses `ConnectionManager` for reconnecting connection reuse. Unlike a cache,
/// errors are propagated: losing a write here means losing records.
pub struct RedisBackend {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisBackend {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "registry:".to_string(),
        })
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl BlobBackend for RedisBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.get::<_, Option<Vec<u8>>>(&key).await.map_err(|e| {
            error!(key = %key, error = %e, "Redis GET failed");
            e.into()
        })
    }

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&key, bytes).await.map_err(|e| {
            error!(key = %key, error = %e, "Redis SET failed");
            AppError::from(e)
        })?;

        debug!(key = %key, "Blob written to Redis");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, AppError> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();

        let deleted: i32 = conn.del(&key).await?;
        Ok(deleted > 0)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
