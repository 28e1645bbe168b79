//! In-process stand-ins for Redis and the token verifier, plus app builders
//! shared by the handler tests.

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::middleware::AuthMode;
use crate::routes;
use crate::secrets::SecretResolver;
use crate::state::AppState;
use crate::store::{KeyValueStore, StoreClient};

/// HashMap-backed store behaving like a single Redis instance
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Write bypassing the adapter, e.g. to plant corrupt data
    pub async fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Store whose every call fails as if Redis were unreachable
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow::anyhow!("Connection refused (os error 111)"))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<()> {
        Err(anyhow::anyhow!("Connection refused (os error 111)"))
    }

    async fn ping(&self) -> Result<()> {
        Err(anyhow::anyhow!("Connection refused (os error 111)"))
    }
}

/// Verifier with a fixed answer
pub enum StaticVerifier {
    Accept,
    Reject,
    Fail,
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, _token: &str) -> Result<bool> {
        match self {
            StaticVerifier::Accept => Ok(true),
            StaticVerifier::Reject => Ok(false),
            StaticVerifier::Fail => Err(anyhow::anyhow!("verification provider unavailable")),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_vars(Vec::new()).expect("default config parses")
}

pub fn test_state(
    config: Config,
    store: Arc<dyn KeyValueStore>,
    secrets: SecretResolver,
) -> AppState {
    AppState {
        store: StoreClient::new(store),
        secrets: Arc::new(secrets),
        config: Arc::new(config),
    }
}

/// Full router over an in-memory store, permissive auth, and the given secrets
pub fn test_app(store: Arc<dyn KeyValueStore>, secrets: SecretResolver) -> Router {
    routes::router(test_state(test_config(), store, secrets), AuthMode::Permissive)
}
