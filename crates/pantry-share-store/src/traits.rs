//! ListStore trait: the abstract interface to the document database.
//!
//! Every lookup filters by owner as well as by id, so a caller can never
//! reach a document through somebody else's user id.

use async_trait::async_trait;
use pantry_share_core::{ItemId, ListId, UserId};

use crate::error::Result;
use crate::model::{Category, ListItem, SharedListView, ShoppingList};

/// Async interface for list, item and category persistence.
#[async_trait]
pub trait ListStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Lists
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new list. Fails with `Duplicate` if the id is taken.
    async fn insert_list(&self, list: &ShoppingList) -> Result<()>;

    /// Get a list by owner and id.
    async fn get_list(&self, owner: &UserId, list_id: &ListId) -> Result<Option<ShoppingList>>;

    /// Overwrite the stored share token of a list.
    ///
    /// `None` clears it. Returns `false` if the list does not exist for this
    /// owner.
    async fn set_share_token(
        &self,
        owner: &UserId,
        list_id: &ListId,
        token: Option<&str>,
        now: i64,
    ) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new category.
    async fn insert_category(&self, category: &Category) -> Result<()>;

    /// All categories of an owner, ordered by position.
    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Items
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new item. The list must exist for the item's owner.
    async fn insert_item(&self, item: &ListItem) -> Result<()>;

    /// All items on a list, ordered by name.
    async fn list_items(&self, owner: &UserId, list_id: &ListId) -> Result<Vec<ListItem>>;

    /// Set the checked flag of an item.
    ///
    /// Returns the updated item, or `None` if no such item is on that list
    /// for that owner.
    async fn toggle_item(
        &self,
        owner: &UserId,
        list_id: &ListId,
        item_id: &ItemId,
        checked: bool,
        now: i64,
    ) -> Result<Option<ListItem>>;
}

/// Extension trait for common store patterns.
#[async_trait]
pub trait StoreExt: ListStore {
    /// Load a list together with its items and the owner's categories.
    async fn resolve_shared_list(
        &self,
        owner: &UserId,
        list_id: &ListId,
    ) -> Result<Option<SharedListView>> {
        let Some(list) = self.get_list(owner, list_id).await? else {
            return Ok(None);
        };
        let items = self.list_items(owner, list_id).await?;
        let categories = self.list_categories(owner).await?;

        Ok(Some(SharedListView {
            list,
            items,
            categories,
        }))
    }
}

impl<S: ListStore + ?Sized> StoreExt for S {}
