use anyhow::{Context, Result};
use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// External authority deciding whether a bearer token is acceptable
///
/// `Ok(false)` means the token was checked and rejected; `Err` means the
/// check itself could not be carried out.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verifies JWT signatures locally with a configured key
///
/// RS256 when `JWT_PUBLIC_KEY` is configured, otherwise HS256 over `JWT_SECRET`.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_config(config: &Config) -> Result<Self> {
        let (algorithm, decoding_key) = if let Some(public_key) = &config.jwt_public_key {
            tracing::info!("Initializing JWT verification with RS256 algorithm");
            let key = DecodingKey::from_rsa_pem(public_key.as_bytes())
                .context("Failed to parse JWT_PUBLIC_KEY as RSA PEM")?;
            (Algorithm::RS256, key)
        } else if let Some(secret) = &config.jwt_secret {
            tracing::info!("Initializing JWT verification with HS256 algorithm");
            (Algorithm::HS256, DecodingKey::from_secret(secret.as_bytes()))
        } else {
            anyhow::bail!(
                "No JWT configuration provided. Set either:\n\
                - JWT_PUBLIC_KEY (RS256)\n\
                - JWT_SECRET (HS256)"
            );
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<bool> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                tracing::debug!(
                    sub = ?data.claims.sub,
                    iss = ?data.claims.iss,
                    exp = data.claims.exp,
                    "JWT verified"
                );
                Ok(true)
            }
            Err(e) => match e.kind() {
                // Key material or crypto backend problems are ours, not the caller's
                ErrorKind::InvalidRsaKey(_)
                | ErrorKind::InvalidEcdsaKey
                | ErrorKind::InvalidKeyFormat
                | ErrorKind::Crypto(_) => {
                    Err(anyhow::Error::new(e).context("JWT verification could not be performed"))
                }
                _ => {
                    tracing::debug!(error = %e, "JWT rejected");
                    Ok(false)
                }
            },
        }
    }
}
