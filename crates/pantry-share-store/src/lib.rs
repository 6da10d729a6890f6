//! # Pantry Share Store
//!
//! Storage abstraction for shared shopping lists. Provides a trait-based
//! interface over the document database with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The share flow only needs a narrow slice of the database: resolve a list
//! by `(owner, list)`, read its items and the owner's categories, flip an
//! item's checked flag, and remember which share token is current.
//!
//! ## Key Types
//!
//! - [`ListStore`] - The async trait for all storage operations
//! - [`SqliteListStore`] - SQLite-based persistent storage
//! - [`MemoryListStore`] - In-memory storage for tests
//! - [`SharedListView`] - A list with its items and categories
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pantry_share_store::{ListStore, ShoppingList, SqliteListStore, StoreExt};
//!
//! async fn example() {
//!     let store = SqliteListStore::open("lists.db").unwrap();
//!
//!     let list = ShoppingList::new("list-abc".into(), "user-123".into(), "Weekly", 0);
//!     store.insert_list(&list).await.unwrap();
//!
//!     let view = store
//!         .resolve_shared_list(&"user-123".into(), &"list-abc".into())
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Owner scoping**: every read and write filters on the owner.
//! - **Token overwrite**: a list stores at most one share token; setting a
//!   new one replaces the old, which is how links are revoked.

pub mod error;
pub mod memory;
pub mod migration;
pub mod model;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryListStore;
pub use model::{Category, ListItem, SharedListView, ShoppingList};
pub use sqlite::SqliteListStore;
pub use traits::{ListStore, StoreExt};
