//! Secret providers: where the share key comes from.

use std::collections::HashMap;

use crate::crypto::ShareKey;
use crate::error::{ConfigurationError, Result};

/// Name of the secret holding the share key, unless configured otherwise.
pub const DEFAULT_SECRET_NAME: &str = "SHARE_TOKEN_SECRET";

/// A source of named secrets.
pub trait SecretProvider: Send + Sync {
    /// Look up a secret by name. `None` when unset.
    fn get_secret(&self, name: &str) -> Option<String>;

    /// Read and parse the share key named `name`.
    fn share_key(&self, name: &str) -> Result<ShareKey> {
        let secret = self
            .get_secret(name)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigurationError::MissingSecret {
                name: name.to_owned(),
            })?;
        ShareKey::from_hex(name, &secret)
    }
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

impl SecretProvider for EnvSecretProvider {
    fn get_secret(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Serves secrets from an in-memory map.
#[derive(Default, Clone)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a secret.
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }

    /// Provider holding `key` under [`DEFAULT_SECRET_NAME`].
    pub fn with_key(key: &ShareKey) -> Self {
        Self::new().with_secret(DEFAULT_SECRET_NAME, key.to_hex())
    }
}

impl std::fmt::Debug for StaticSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSecretProvider")
            .field("names", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SecretProvider for StaticSecretProvider {
    fn get_secret(&self, name: &str) -> Option<String> {
        self.secrets.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_key() {
        let key = ShareKey::from_bytes([0x07; 32]);
        let provider = StaticSecretProvider::with_key(&key);
        let loaded = provider.share_key(DEFAULT_SECRET_NAME).unwrap();
        assert_eq!(loaded.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_missing_secret() {
        let provider = StaticSecretProvider::new();
        assert_eq!(
            provider.share_key("NOPE").unwrap_err(),
            ConfigurationError::MissingSecret {
                name: "NOPE".into()
            }
        );
    }

    #[test]
    fn test_empty_secret_is_missing() {
        let provider = StaticSecretProvider::new().with_secret("S", "");
        assert!(matches!(
            provider.share_key("S"),
            Err(ConfigurationError::MissingSecret { .. })
        ));
    }

    #[test]
    fn test_ten_char_secret_rejected() {
        let provider = StaticSecretProvider::new().with_secret("S", "abcdef0123");
        assert!(matches!(
            provider.share_key("S"),
            Err(ConfigurationError::InvalidKeyLength { actual: 5, .. })
        ));
    }

    #[test]
    fn test_env_provider_unset() {
        let provider = EnvSecretProvider;
        assert!(provider
            .get_secret("PANTRY_SHARE_TEST_SURELY_UNSET_VARIABLE")
            .is_none());
    }
}
