//! Error types for the share service.

use pantry_share_core::{ConfigurationError, ItemId, ListId};
use pantry_share_store::StoreError;
use thiserror::Error;

/// Errors that can occur during share operations.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The share key is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A service setting could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The presented token does not grant access.
    ///
    /// Covers malformed, tampered, foreign-key, expired, superseded and
    /// revoked tokens alike.
    #[error("not authorized")]
    Unauthorized,

    /// The owner has no such list.
    #[error("list not found: {0}")]
    ListNotFound(ListId),

    /// The shared list has no such item.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
}

impl ShareError {
    /// HTTP status a route handler should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ShareError::Unauthorized => 401,
            ShareError::ListNotFound(_) | ShareError::ItemNotFound(_) => 404,
            ShareError::Configuration(_) | ShareError::InvalidConfig(_) | ShareError::Store(_) => {
                500
            }
        }
    }
}

/// Result type for share operations.
pub type Result<T> = std::result::Result<T, ShareError>;
