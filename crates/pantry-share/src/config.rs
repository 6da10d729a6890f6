//! Configuration for the share service.

use serde::Deserialize;

use pantry_share_core::DEFAULT_SECRET_NAME;

use crate::error::{Result, ShareError};

/// Environment variable overriding [`ShareConfig::max_token_age_secs`].
pub const MAX_AGE_ENV: &str = "SHARE_TOKEN_MAX_AGE_SECS";

/// Environment variable overriding [`ShareConfig::secret_name`].
pub const SECRET_NAME_ENV: &str = "SHARE_TOKEN_SECRET_NAME";

/// Configuration for the share service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Name of the secret holding the 64-character hex key.
    pub secret_name: String,
    /// Reject tokens older than this. `None` accepts tokens of any age.
    pub max_token_age_secs: Option<u64>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_owned(),
            max_token_age_secs: None,
        }
    }
}

impl ShareConfig {
    /// Defaults, overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(name) = lookup(SECRET_NAME_ENV).filter(|s| !s.is_empty()) {
            config.secret_name = name;
        }

        if let Some(raw) = lookup(MAX_AGE_ENV).filter(|s| !s.is_empty()) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                ShareError::InvalidConfig(format!("{}={:?}: {}", MAX_AGE_ENV, raw, e))
            })?;
            config.max_token_age_secs = Some(secs);
        }

        Ok(config)
    }

    /// Set a maximum token age.
    pub fn with_max_token_age_secs(mut self, secs: u64) -> Self {
        self.max_token_age_secs = Some(secs);
        self
    }

    /// Maximum token age in milliseconds, if any.
    pub fn max_token_age_millis(&self) -> Option<i64> {
        self.max_token_age_secs
            .map(|secs| i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX))
    }
}
