use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use crate::config::Config;

/// Minimal get/set surface of the external key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn ping(&self) -> Result<()>;
}

/// Redis-backed store holding one managed connection for the process lifetime
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis using the host, port and password from configuration
    ///
    /// The connection manager reconnects on its own after a dropped
    /// connection; commands issued meanwhile fail and are not retried.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut info = (config.redis_host.clone(), config.redis_port)
            .into_connection_info()
            .context("Invalid Redis connection parameters")?;
        info.redis.password = config.redis_password.clone();

        tracing::info!(
            "Connecting to Redis at {}:{}",
            config.redis_host,
            config.redis_port
        );

        let client = redis::Client::open(info).context("Failed to create Redis client")?;
        let conn = client
            .get_connection_manager()
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Successfully connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .get(key)
            .await
            .with_context(|| format!("Failed to read key '{}' from Redis", key))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(key, value)
            .await
            .with_context(|| format!("Failed to write key '{}' to Redis", key))?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Failed to ping Redis")?;
        Ok(())
    }
}

/// Shareable store adapter for use across async handlers
///
/// Keys are lower-cased and trimmed before every store interaction, so
/// `"Test_Key "` and `"test_key"` address the same entry. Values are JSON
/// documents serialized to strings on the wire.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<dyn KeyValueStore>,
}

impl StoreClient {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    pub fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// Read a JSON document by key
    ///
    /// # Returns
    /// * `Ok(Some(data))` - Entry found and parsed
    /// * `Ok(None)` - No entry under the normalized key
    /// * `Err(_)` - Store failure, or the stored string is not valid JSON
    pub async fn get_value(&self, key: &str) -> Result<Option<JsonValue>> {
        let key = Self::normalize_key(key);

        let Some(raw) = self.inner.get(&key).await? else {
            tracing::debug!("Key not found: {}", key);
            return Ok(None);
        };

        let data: JsonValue = serde_json::from_str(&raw)
            .with_context(|| format!("Stored value for key '{}' is not valid JSON", key))?;

        tracing::debug!("Read value for key: {}", key);
        Ok(Some(data))
    }

    /// Store a JSON object under the normalized key, overwriting any prior value
    ///
    /// Size and type validation happen before this point; this only
    /// serializes and writes.
    pub async fn set_value(&self, key: &str, value: &Map<String, JsonValue>) -> Result<()> {
        let key = Self::normalize_key(key);
        let data = serde_json::to_string(value).context("Failed to serialize JSON value")?;

        self.inner.set(&key, data).await?;

        tracing::debug!("Wrote value for key: {}", key);
        Ok(())
    }

    /// Verify the store is reachable
    pub async fn health_check(&self) -> Result<()> {
        self.inner.ping().await
    }
}
