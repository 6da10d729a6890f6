//! SQLite implementation of the ListStore trait.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use pantry_share_core::{ItemId, ListId, UserId};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::model::{Category, ListItem, ShoppingList};
use crate::traits::ListStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteListStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteListStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

const LIST_COLUMNS: &str = "list_id, owner, name, share_token, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "item_id, list_id, owner, name, quantity, category_id, checked, updated_at";

fn row_to_list(row: &rusqlite::Row<'_>) -> rusqlite::Result<ShoppingList> {
    Ok(ShoppingList {
        id: ListId::new(row.get::<_, String>("list_id")?),
        owner: UserId::new(row.get::<_, String>("owner")?),
        name: row.get("name")?,
        share_token: row.get("share_token")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get::<_, String>("category_id")?.into(),
        owner: UserId::new(row.get::<_, String>("owner")?),
        name: row.get("name")?,
        position: row.get("position")?,
    })
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListItem> {
    Ok(ListItem {
        id: ItemId::new(row.get::<_, String>("item_id")?),
        list_id: ListId::new(row.get::<_, String>("list_id")?),
        owner: UserId::new(row.get::<_, String>("owner")?),
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        category_id: row.get::<_, Option<String>>("category_id")?.map(Into::into),
        checked: row.get("checked")?,
        updated_at: row.get("updated_at")?,
    })
}

fn exists(conn: &Connection, sql: &str, id: &str) -> Result<bool> {
    Ok(conn
        .query_row(sql, params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

#[async_trait]
impl ListStore for SqliteListStore {
    async fn insert_list(&self, list: &ShoppingList) -> Result<()> {
        let list = list.clone();
        self.blocking(move |conn| {
            if exists(conn, "SELECT 1 FROM lists WHERE list_id = ?1", list.id.as_str())? {
                return Err(StoreError::Duplicate {
                    kind: "list",
                    id: list.id.to_string(),
                });
            }

            conn.execute(
                "INSERT INTO lists (list_id, owner, name, share_token, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    list.id.as_str(),
                    list.owner.as_str(),
                    list.name,
                    list.share_token,
                    list.created_at,
                    list.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_list(&self, owner: &UserId, list_id: &ListId) -> Result<Option<ShoppingList>> {
        let owner = owner.clone();
        let list_id = list_id.clone();
        self.blocking(move |conn| {
            conn.query_row(
                &format!("SELECT {LIST_COLUMNS} FROM lists WHERE list_id = ?1 AND owner = ?2"),
                params![list_id.as_str(), owner.as_str()],
                row_to_list,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn set_share_token(
        &self,
        owner: &UserId,
        list_id: &ListId,
        token: Option<&str>,
        now: i64,
    ) -> Result<bool> {
        let owner = owner.clone();
        let list_id = list_id.clone();
        let token = token.map(str::to_owned);
        self.blocking(move |conn| {
            let changed = conn.execute(
                "UPDATE lists SET share_token = ?1, updated_at = ?2
                 WHERE list_id = ?3 AND owner = ?4",
                params![token, now, list_id.as_str(), owner.as_str()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        let category = category.clone();
        self.blocking(move |conn| {
            if exists(
                conn,
                "SELECT 1 FROM categories WHERE category_id = ?1",
                category.id.as_str(),
            )? {
                return Err(StoreError::Duplicate {
                    kind: "category",
                    id: category.id.to_string(),
                });
            }

            conn.execute(
                "INSERT INTO categories (category_id, owner, name, position)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    category.id.as_str(),
                    category.owner.as_str(),
                    category.name,
                    category.position,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_categories(&self, owner: &UserId) -> Result<Vec<Category>> {
        let owner = owner.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT category_id, owner, name, position FROM categories
                 WHERE owner = ?1 ORDER BY position, category_id",
            )?;
            let categories = stmt
                .query_map(params![owner.as_str()], row_to_category)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories)
        })
        .await
    }

    async fn insert_item(&self, item: &ListItem) -> Result<()> {
        let item = item.clone();
        self.blocking(move |conn| {
            let tx = conn.transaction()?;

            let list_exists = tx
                .query_row(
                    "SELECT 1 FROM lists WHERE list_id = ?1 AND owner = ?2",
                    params![item.list_id.as_str(), item.owner.as_str()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !list_exists {
                return Err(StoreError::ListNotFound(item.list_id.to_string()));
            }

            if exists(&tx, "SELECT 1 FROM items WHERE item_id = ?1", item.id.as_str())? {
                return Err(StoreError::Duplicate {
                    kind: "item",
                    id: item.id.to_string(),
                });
            }

            tx.execute(
                "INSERT INTO items (
                    item_id, list_id, owner, name, quantity, category_id, checked, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    item.id.as_str(),
                    item.list_id.as_str(),
                    item.owner.as_str(),
                    item.name,
                    item.quantity,
                    item.category_id.as_ref().map(|c| c.as_str()),
                    item.checked,
                    item.updated_at,
                ],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn list_items(&self, owner: &UserId, list_id: &ListId) -> Result<Vec<ListItem>> {
        let owner = owner.clone();
        let list_id = list_id.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE owner = ?1 AND list_id = ?2 ORDER BY name, item_id"
            ))?;
            let items = stmt
                .query_map(params![owner.as_str(), list_id.as_str()], row_to_item)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
        .await
    }

    async fn toggle_item(
        &self,
        owner: &UserId,
        list_id: &ListId,
        item_id: &ItemId,
        checked: bool,
        now: i64,
    ) -> Result<Option<ListItem>> {
        let owner = owner.clone();
        let list_id = list_id.clone();
        let item_id = item_id.clone();
        self.blocking(move |conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE items SET checked = ?1, updated_at = ?2
                 WHERE item_id = ?3 AND owner = ?4 AND list_id = ?5",
                params![checked, now, item_id.as_str(), owner.as_str(), list_id.as_str()],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            let item = tx.query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM items WHERE item_id = ?1"),
                params![item_id.as_str()],
                row_to_item,
            )?;

            tx.commit()?;
            Ok(Some(item))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;

    async fn seeded(store: &SqliteListStore) {
        store
            .insert_list(&ShoppingList::new("l1".into(), "alice".into(), "Weekly", 1))
            .await
            .unwrap();
        store
            .insert_category(&Category::new("dairy".into(), "alice".into(), "Dairy", 2))
            .await
            .unwrap();
        store
            .insert_category(&Category::new("bakery".into(), "alice".into(), "Bakery", 1))
            .await
            .unwrap();
        store
            .insert_item(
                &ListItem::new("i1".into(), "l1".into(), "alice".into(), "Milk", 2, 1)
                    .in_category("dairy".into()),
            )
            .await
            .unwrap();
        store
            .insert_item(&ListItem::new("i2".into(), "l1".into(), "alice".into(), "Bread", 1, 1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get_list() {
        let store = SqliteListStore::open_memory().unwrap();
        seeded(&store).await;

        let list = store
            .get_list(&"alice".into(), &"l1".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(list.name, "Weekly");
        assert!(!list.is_shared());

        assert!(store
            .get_list(&"bob".into(), &"l1".into())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_list_rejected() {
        let store = SqliteListStore::open_memory().unwrap();
        seeded(&store).await;

        let err = store
            .insert_list(&ShoppingList::new("l1".into(), "alice".into(), "Again", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { kind: "list", .. }));
    }

    #[tokio::test]
    async fn test_item_requires_owned_list() {
        let store = SqliteListStore::open_memory().unwrap();
        seeded(&store).await;

        let err = store
            .insert_item(&ListItem::new("i3".into(), "l1".into(), "bob".into(), "Eggs", 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ListNotFound(_)));
    }

    #[tokio::test]
    async fn test_share_token_overwrite() {
        let store = SqliteListStore::open_memory().unwrap();
        seeded(&store).await;
        let alice = UserId::new("alice");
        let l1 = ListId::new("l1");

        assert!(store.set_share_token(&alice, &l1, Some("first"), 10).await.unwrap());
        assert!(store.set_share_token(&alice, &l1, Some("second"), 11).await.unwrap());

        let list = store.get_list(&alice, &l1).await.unwrap().unwrap();
        assert_eq!(list.share_token.as_deref(), Some("second"));
        assert_eq!(list.updated_at, 11);

        assert!(!store
            .set_share_token(&alice, &"missing".into(), Some("x"), 12)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_toggle_and_resolve() {
        let store = SqliteListStore::open_memory().unwrap();
        seeded(&store).await;
        let alice = UserId::new("alice");
        let l1 = ListId::new("l1");

        let milk = store
            .toggle_item(&alice, &l1, &"i1".into(), true, 20)
            .await
            .unwrap()
            .unwrap();
        assert!(milk.checked);
        assert_eq!(milk.category_id.as_ref().map(|c| c.as_str()), Some("dairy"));

        assert!(store
            .toggle_item(&alice, &"other".into(), &"i2".into(), true, 20)
            .await
            .unwrap()
            .is_none());

        let view = store.resolve_shared_list(&alice, &l1).await.unwrap().unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].name, "Bread");
        assert_eq!(view.categories[0].name, "Bakery");
        assert_eq!(view.remaining(), 1);
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.db");

        {
            let store = SqliteListStore::open(&path).unwrap();
            seeded(&store).await;
            store
                .set_share_token(&"alice".into(), &"l1".into(), Some("tok"), 5)
                .await
                .unwrap();
        }

        let store = SqliteListStore::open(&path).unwrap();
        let list = store
            .get_list(&"alice".into(), &"l1".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(list.share_token.as_deref(), Some("tok"));
    }
}
