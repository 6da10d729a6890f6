//! Documents held by the list store.

use serde::{Deserialize, Serialize};

use pantry_share_core::{CategoryId, ItemId, ListId, UserId};

/// A shopping list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: ListId,
    pub owner: UserId,
    pub name: String,
    /// The currently valid share token, if the list is shared.
    ///
    /// Issuing a new token overwrites this, which invalidates the old link.
    pub share_token: Option<String>,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds.
    pub updated_at: i64,
}

impl ShoppingList {
    /// A new, unshared list.
    pub fn new(id: ListId, owner: UserId, name: impl Into<String>, now: i64) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            share_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the list is currently shared.
    pub fn is_shared(&self) -> bool {
        self.share_token.is_some()
    }
}

/// A product category, scoped to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub owner: UserId,
    pub name: String,
    /// Display order; lower comes first.
    pub position: i64,
}

impl Category {
    pub fn new(id: CategoryId, owner: UserId, name: impl Into<String>, position: i64) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            position,
        }
    }
}

/// An entry on a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: ItemId,
    pub list_id: ListId,
    pub owner: UserId,
    pub name: String,
    pub quantity: u32,
    pub category_id: Option<CategoryId>,
    pub checked: bool,
    /// Unix milliseconds.
    pub updated_at: i64,
}

impl ListItem {
    /// A new, unchecked item.
    pub fn new(
        id: ItemId,
        list_id: ListId,
        owner: UserId,
        name: impl Into<String>,
        quantity: u32,
        now: i64,
    ) -> Self {
        Self {
            id,
            list_id,
            owner,
            name: name.into(),
            quantity,
            category_id: None,
            checked: false,
            updated_at: now,
        }
    }

    /// Assign a category.
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// What a share-link holder gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedListView {
    pub list: ShoppingList,
    pub items: Vec<ListItem>,
    pub categories: Vec<Category>,
}

impl SharedListView {
    /// Number of items still to buy.
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|item| !item.checked).count()
    }
}
