use crate::config::Config;
use crate::secrets::SecretResolver;
use crate::store::StoreClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: StoreClient,
    pub secrets: Arc<SecretResolver>,
    pub config: Arc<Config>,
}
