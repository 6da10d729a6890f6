//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use pantry_share::{ShareConfig, ShareService};
use pantry_share_core::{
    now_millis, ListId, ShareKey, ShareToken, ShareTokenCodec, StaticSecretProvider, UserId,
    DEFAULT_SECRET_NAME,
};
use pantry_share_store::{Category, ListItem, ListStore, MemoryListStore, ShoppingList};

/// Item ids seeded by [`TestFixture::seed`].
pub const SEEDED_ITEMS: [&str; 3] = ["item-apples", "item-milk", "item-bread"];

/// Category ids seeded by [`TestFixture::seed`].
pub const SEEDED_CATEGORIES: [&str; 2] = ["cat-produce", "cat-dairy"];

/// A test fixture: one owner, one list, one key.
pub struct TestFixture {
    pub key: ShareKey,
    pub owner: UserId,
    pub list_id: ListId,
}

impl TestFixture {
    /// Create a new test fixture with a random key.
    pub fn new() -> Self {
        Self::with_key(ShareKey::generate())
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_key(ShareKey::from_bytes(seed))
    }

    fn with_key(key: ShareKey) -> Self {
        Self {
            key,
            owner: UserId::new("user-123"),
            list_id: ListId::new("list-abc"),
        }
    }

    /// Use a different owner.
    pub fn owned_by(mut self, owner: impl Into<UserId>) -> Self {
        self.owner = owner.into();
        self
    }

    /// A codec sealing under this fixture's key.
    pub fn codec(&self) -> ShareTokenCodec {
        ShareTokenCodec::new(self.key.clone())
    }

    /// A secret provider holding this fixture's key under the default name.
    pub fn secret_provider(&self) -> Arc<StaticSecretProvider> {
        Arc::new(StaticSecretProvider::with_key(&self.key))
    }

    /// Hex secret as it would appear in the environment.
    pub fn secret_hex(&self) -> String {
        self.key.to_hex()
    }

    /// Write the fixture's list with two categories and three items.
    ///
    /// Apples are produce, milk is dairy, bread has no category.
    pub async fn seed<S: ListStore>(&self, store: &S) -> pantry_share_store::Result<()> {
        let now = now_millis();

        store
            .insert_list(&ShoppingList::new(
                self.list_id.clone(),
                self.owner.clone(),
                "Weekly groceries",
                now,
            ))
            .await?;

        for (position, (id, name)) in SEEDED_CATEGORIES
            .iter()
            .zip(["Produce", "Dairy"])
            .enumerate()
        {
            store
                .insert_category(&Category::new(
                    (*id).into(),
                    self.owner.clone(),
                    name,
                    position as i64,
                ))
                .await?;
        }

        let items = [
            self.item(SEEDED_ITEMS[0], "Apples", 6, now)
                .in_category(SEEDED_CATEGORIES[0].into()),
            self.item(SEEDED_ITEMS[1], "Milk", 1, now)
                .in_category(SEEDED_CATEGORIES[1].into()),
            self.item(SEEDED_ITEMS[2], "Bread", 2, now),
        ];
        for item in &items {
            store.insert_item(item).await?;
        }

        Ok(())
    }

    fn item(&self, id: &str, name: &str, quantity: u32, now: i64) -> ListItem {
        ListItem::new(
            id.into(),
            self.list_id.clone(),
            self.owner.clone(),
            name,
            quantity,
            now,
        )
    }

    /// A memory store already holding the seeded list.
    pub async fn seeded_store(&self) -> MemoryListStore {
        let store = MemoryListStore::new();
        self.seed(&store).await.expect("seed memory store");
        store
    }

    /// A service over a seeded memory store, reading the key through a
    /// secret provider.
    pub async fn service(&self) -> ShareService<MemoryListStore> {
        self.service_with_config(ShareConfig::default()).await
    }

    /// Like [`TestFixture::service`] with a custom configuration.
    pub async fn service_with_config(&self, config: ShareConfig) -> ShareService<MemoryListStore> {
        let config = ShareConfig {
            secret_name: DEFAULT_SECRET_NAME.to_owned(),
            ..config
        };
        ShareService::with_secret_provider(self.secret_provider(), self.seeded_store().await, config)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct keys and owners.
pub fn multi_owner_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed).owned_by(format!("user-{}", i))
        })
        .collect()
}

/// Length of the binary blob behind a token.
pub fn decoded_len(token: &ShareToken) -> usize {
    URL_SAFE_NO_PAD
        .decode(token.as_str())
        .expect("token is base64url")
        .len()
}

/// Re-encode a token with one byte of its binary form inverted.
pub fn flip_token_byte(token: &ShareToken, index: usize) -> String {
    let mut raw = URL_SAFE_NO_PAD
        .decode(token.as_str())
        .expect("token is base64url");
    raw[index] ^= 0xff;
    URL_SAFE_NO_PAD.encode(raw)
}

/// Re-encode a token keeping only its first `len` bytes.
pub fn truncate_token(token: &ShareToken, len: usize) -> String {
    let raw = URL_SAFE_NO_PAD
        .decode(token.as_str())
        .expect("token is base64url");
    URL_SAFE_NO_PAD.encode(&raw[..len.min(raw.len())])
}

/// Send log output to the test harness. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_share_core::MIN_TOKEN_LEN;

    #[tokio::test]
    async fn test_seeded_store() {
        let fixture = TestFixture::new();
        let store = fixture.seeded_store().await;

        let list = store
            .get_list(&fixture.owner, &fixture.list_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!list.is_shared());

        let items = store.list_items(&fixture.owner, &fixture.list_id).await.unwrap();
        assert_eq!(items.len(), SEEDED_ITEMS.len());

        let categories = store.list_categories(&fixture.owner).await.unwrap();
        assert_eq!(categories.len(), SEEDED_CATEGORIES.len());
        assert_eq!(categories[0].name, "Produce");
    }

    #[tokio::test]
    async fn test_service_issues_links() {
        init_tracing();
        let fixture = TestFixture::new();
        let service = fixture.service().await;

        let token = service
            .create_share_link(&fixture.owner, &fixture.list_id)
            .await
            .unwrap();
        assert!(decoded_len(&token) > MIN_TOKEN_LEN);

        let payload = fixture.codec().decode(token.as_str()).unwrap().unwrap();
        assert_eq!(payload.user_id(), &fixture.owner);
        assert_eq!(payload.list_id(), &fixture.list_id);
    }

    #[test]
    fn test_token_helpers() {
        let fixture = TestFixture::with_seed([7; 32]);
        let token = fixture
            .codec()
            .encode(&fixture.owner, &fixture.list_id)
            .unwrap();

        let flipped = flip_token_byte(&token, 0);
        assert_ne!(flipped, token.as_str());
        assert_eq!(fixture.codec().decode(&flipped).unwrap(), None);

        let short = truncate_token(&token, MIN_TOKEN_LEN - 1);
        assert_eq!(fixture.codec().decode(&short).unwrap(), None);
    }

    #[test]
    fn test_multi_owner() {
        let owners = multi_owner_fixtures(3);

        let hexes: Vec<_> = owners.iter().map(|o| o.secret_hex()).collect();
        assert_ne!(hexes[0], hexes[1]);
        assert_ne!(hexes[1], hexes[2]);
        assert_ne!(owners[0].owner, owners[2].owner);
    }
}
