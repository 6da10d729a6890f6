//! In-memory implementation of the ListStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use pantry_share_core::{CategoryId, ItemId, ListId, UserId};

use crate::error::{Result, StoreError};
use crate::model::{Category, ListItem, ShoppingList};
use crate::traits::ListStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryListStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    lists: HashMap<ListId, ShoppingList>,
    categories: HashMap<CategoryId, Category>,
    items: HashMap<ItemId, ListItem>,
}

impl MemoryListStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryListStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn insert_list(&self, list: &ShoppingList) -> Result<()> {
        let mut inner = self.write()?;
        if inner.lists.contains_key(&list.id) {
            return Err(StoreError::Duplicate {
                kind: "list",
                id: list.id.to_string(),
            });
        }
        inner.lists.insert(list.id.clone(), list.clone());
        Ok(())
    }

    async fn get_list(&self, owner: &UserId, list_id: &ListId) -> Result<Option<ShoppingList>> {
        let inner = self.read()?;
        Ok(inner
            .lists
            .get(list_id)
            .filter(|list| &list.owner == owner)
            .cloned())
    }

    async fn set_share_token(
        &self,
        owner: &UserId,
        list_id: &ListId,
        token: Option<&str>,
        now: i64,
    ) -> Result<bool> {
        let mut inner = self.write()?;
        match inner.lists.get_mut(list_id) {
            Some(list) if &list.owner == owner => {
                list.share_token = token.map(str::to_owned);
                list.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        let mut inner = self.write()?;
        if inner.categories.contains_key(&category.id) {
            return Err(StoreError::Duplicate {
                kind: "category",
                id: category.id.to_string(),
            });
        }
        inner.categories.insert(category.id.clone(), category.clone());
        Ok(())
    }

    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>> {
        let inner = self.read()?;
        let mut categories: Vec<Category> = inner
            .categories
            .values()
            .filter(|c| &c.owner == owner)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn insert_item(&self, item: &ListItem) -> Result<()> {
        let mut inner = self.write()?;

        let list_exists = inner
            .lists
            .get(&item.list_id)
            .is_some_and(|list| list.owner == item.owner);
        if !list_exists {
            return Err(StoreError::ListNotFound(item.list_id.to_string()));
        }

        if inner.items.contains_key(&item.id) {
            return Err(StoreError::Duplicate {
                kind: "item",
                id: item.id.to_string(),
            });
        }
        inner.items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn list_items(&self, owner: &UserId, list_id: &ListId) -> Result<Vec<ListItem>> {
        let inner = self.read()?;
        let mut items: Vec<ListItem> = inner
            .items
            .values()
            .filter(|i| &i.owner == owner && &i.list_id == list_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn toggle_item(
        &self,
        owner: &UserId,
        list_id: &ListId,
        item_id: &ItemId,
        checked: bool,
        now: i64,
    ) -> Result<Option<ListItem>> {
        let mut inner = self.write()?;
        match inner.items.get_mut(item_id) {
            Some(item) if &item.owner == owner && &item.list_id == list_id => {
                item.checked = checked;
                item.updated_at = now;
                Ok(Some(item.clone()))
            }
            _ => Ok(None),
        }
    }
}
