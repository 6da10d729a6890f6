//! # Pantry Share
//!
//! Share a shopping list by link.
//!
//! ## Overview
//!
//! A list owner asks for a share link; anyone holding the link can read the
//! list and tick items off without signing in. This crate provides:
//!
//! - **Issuance**: mint a token for `(owner, list)` and record it as the
//!   list's current token
//! - **Access**: resolve a token to the list, its items and categories
//! - **Toggle**: check or uncheck an item through the link
//! - **Revocation**: clear the stored token, or issue a new one
//!
//! ## Security Model
//!
//! - Tokens are AES-256-GCM sealed; any altered byte makes them invalid.
//! - Every token-shaped failure is the same [`ShareError::Unauthorized`].
//! - Only the most recently issued token for a list is honored.
//! - A missing or malformed key is [`ShareError::Configuration`], never a
//!   silently broken token.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pantry_share::{ShareConfig, ShareService};
//! use pantry_share::core::EnvSecretProvider;
//! use pantry_share::store::SqliteListStore;
//!
//! async fn example() {
//!     let config = ShareConfig::from_env().unwrap();
//!     let store = SqliteListStore::open("lists.db").unwrap();
//!     let service = ShareService::with_secret_provider(Arc::new(EnvSecretProvider), store, config);
//!
//!     let token = service
//!         .create_share_link(&"user-123".into(), &"list-abc".into())
//!         .await
//!         .unwrap();
//!
//!     let view = service.shared_list(token.as_str()).await.unwrap();
//!     let first = view.items[0].id.clone();
//!     service.toggle_shared_item(token.as_str(), &first, true).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pantry_share::core` - Identifiers, payload, codec
//! - `pantry_share::store` - Storage abstraction and SQLite

pub mod config;
pub mod error;
pub mod service;

pub use pantry_share_core as core;
pub use pantry_share_store as store;

pub use config::ShareConfig;
pub use error::{Result, ShareError};
pub use service::ShareService;

pub use pantry_share_core::{
    ItemId, ListId, SharePayload, ShareToken, ShareTokenCodec, UserId,
};
pub use pantry_share_store::{ListItem, ListStore, SharedListView, ShoppingList};
