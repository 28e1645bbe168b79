use std::collections::HashMap;

/// Prefix shared by every secret entry in the process environment
pub const SECRET_PREFIX: &str = "SECRET_";

/// Read-only view of the `SECRET_*` entries captured at startup
#[derive(Debug, Clone, Default)]
pub struct SecretResolver {
    secrets: HashMap<String, String>,
}

impl SecretResolver {
    /// Snapshot the secret entries out of a `(name, value)` listing.
    ///
    /// Anything not carrying [`SECRET_PREFIX`] is ignored, so the full process
    /// environment can be passed straight in.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let secrets = vars
            .into_iter()
            .filter(|(name, _)| name.starts_with(SECRET_PREFIX))
            .collect();
        Self { secrets }
    }

    /// Environment name a caller-supplied key maps to
    pub fn lookup_name(raw_key: &str) -> String {
        format!("{}{}", SECRET_PREFIX, raw_key.trim().to_uppercase())
    }

    /// Resolve a secret by key
    ///
    /// # Returns
    /// * `Some(value)` - A non-empty secret exists under the derived name
    /// * `None` - No such secret, or it was configured empty
    pub fn resolve(&self, raw_key: &str) -> Option<&str> {
        self.secrets
            .get(&Self::lookup_name(raw_key))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn count(&self) -> usize {
        self.secrets.len()
    }
}
