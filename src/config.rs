use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;

pub const DEFAULT_MAX_JSON_SIZE: usize = 100 * 1024;
pub const DEFAULT_MAX_BODY_SIZE: usize = 100 * 1024;

/// Deployment environment, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Process environment as UTF-8 `(name, value)` pairs
pub fn env_vars() -> impl Iterator<Item = (String, String)> {
    utf8_vars(env::vars_os())
}

/// Keep the entries whose name and value are both valid UTF-8
///
/// Anything else is skipped with a warning naming the (lossily decoded)
/// variable; its value is never logged.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (name, _) => {
                let name = match name {
                    Ok(name) => name,
                    Err(raw) => raw.to_string_lossy().into_owned(),
                };
                tracing::warn!(variable = %name, "Skipping non UTF-8 environment variable");
                None
            }
        })
}

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    pub environment: Environment,
    pub jwt_secret: Option<String>,
    pub jwt_public_key: Option<String>,
    pub jwt_issuer: Option<String>,
    pub max_json_size: usize,
    pub max_body_size: usize,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env_vars())
    }

    /// Parse configuration from an arbitrary set of `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        // Empty values count as unset
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let redis_host = get("REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let redis_port = get("REDIS_PORT")
            .unwrap_or_else(|| "6379".to_string())
            .parse::<u16>()
            .context("REDIS_PORT must be a valid port number (0-65535)")?;

        let redis_password = get("REDIS_PASSWORD");

        let environment = Environment::parse(get("APP_ENV").as_deref());

        let jwt_secret = get("JWT_SECRET");
        let jwt_public_key = get("JWT_PUBLIC_KEY");
        let jwt_issuer = get("JWT_ISSUER");

        if environment.is_production() && jwt_secret.is_none() && jwt_public_key.is_none() {
            anyhow::bail!(
                "APP_ENV is production but no JWT configuration was provided. \
                 Set JWT_PUBLIC_KEY (RS256) or JWT_SECRET (HS256)"
            );
        }

        let max_json_size = match get("MAX_JSON_SIZE") {
            Some(v) => v
                .parse::<usize>()
                .context("MAX_JSON_SIZE must be a byte count")?,
            None => DEFAULT_MAX_JSON_SIZE,
        };

        let max_body_size = match get("MAX_BODY_SIZE") {
            Some(v) => v
                .parse::<usize>()
                .context("MAX_BODY_SIZE must be a byte count")?,
            None => DEFAULT_MAX_BODY_SIZE,
        };

        let service_port = get("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = get("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            redis_host,
            redis_port,
            redis_password,
            environment,
            jwt_secret,
            jwt_public_key,
            jwt_issuer,
            max_json_size,
            max_body_size,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Environment: {:?}", self.environment);
        tracing::info!(
            "  Redis: {}:{} (password {})",
            self.redis_host,
            self.redis_port,
            if self.redis_password.is_some() { "set" } else { "not set" }
        );
        if self.environment.is_production() {
            let alg = if self.jwt_public_key.is_some() { "RS256" } else { "HS256" };
            tracing::info!("  JWT verification: {}", alg);
        } else {
            tracing::warn!("  JWT verification: disabled (non-production)");
        }
        tracing::info!("  Max JSON value size: {} bytes", self.max_json_size);
        tracing::info!("  Max request body size: {} bytes", self.max_body_size);
        tracing::info!(
            "  Service listening on: {}:{}",
            self.service_host,
            self.service_port
        );
    }
}
