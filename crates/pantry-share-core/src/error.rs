//! Error types for share-token handling.

use thiserror::Error;

/// The share secret is missing or malformed.
///
/// This is an operator error, not a user error: the codec cannot operate
/// without a valid key and callers should surface it as a server failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("share secret {name} is not set")]
    MissingSecret { name: String },

    #[error("share secret {name} is not valid hex: {reason}")]
    InvalidSecretEncoding { name: String, reason: String },

    #[error("share secret {name} must decode to {expected} bytes, got {actual}")]
    InvalidKeyLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Why a presented token was rejected.
///
/// Callers outside this crate should not branch on the reason; the public
/// decode path collapses all of them into a single "invalid" outcome so an
/// attacker probing an endpoint learns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidToken {
    #[error("token is not base64url")]
    Encoding,

    #[error("token decodes to {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("authentication failed")]
    Authentication,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Errors from the detailed decode path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("invalid token: {0}")]
    Invalid(#[from] InvalidToken),
}

/// Result type for key provisioning and encoding.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
