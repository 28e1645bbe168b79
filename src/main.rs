mod api_doc;
mod auth;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod secrets;
mod state;
mod store;
mod validate;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use anyhow::Context;
use auth::JwtVerifier;
use config::Config;
use middleware::AuthMode;
use secrets::SecretResolver;
use state::AppState;
use store::{RedisStore, StoreClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("secret-store-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let secrets = SecretResolver::from_vars(config::env_vars());
    tracing::info!("Loaded {} secret entries", secrets.count());

    let auth = if config.environment.is_production() {
        AuthMode::Strict(Arc::new(JwtVerifier::from_config(&config)?))
    } else {
        AuthMode::Permissive
    };

    let redis = RedisStore::connect(&config).await?;

    let state = AppState {
        store: StoreClient::new(Arc::new(redis)),
        secrets: Arc::new(secrets),
        config: Arc::new(config.clone()),
    };

    let app = routes::router(state, auth);

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
