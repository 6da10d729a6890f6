//! The share service: link issuance and bearer access to a shared list.
//!
//! Brings together the token codec and the list store. The codec proves a
//! token was minted by us for a given `(owner, list)`; the store decides
//! whether that token is still the current one.

use std::sync::Arc;

use tracing::{debug, info, warn};

use pantry_share_core::{
    now_millis, ItemId, ListId, SecretProvider, SharePayload, ShareToken, ShareTokenCodec, UserId,
};
use pantry_share_store::{ListItem, ListStore, SharedListView, ShoppingList};

use crate::config::ShareConfig;
use crate::error::{Result, ShareError};

/// Share-link operations over a list store.
pub struct ShareService<S: ListStore> {
    codec: ShareTokenCodec,
    store: Arc<S>,
    config: ShareConfig,
}

impl<S: ListStore> ShareService<S> {
    /// Create a service with an explicit codec.
    pub fn new(codec: ShareTokenCodec, store: S, config: ShareConfig) -> Self {
        Self {
            codec,
            store: Arc::new(store),
            config,
        }
    }

    /// Create a service whose key is read from `provider` under
    /// `config.secret_name`.
    pub fn with_secret_provider(
        provider: Arc<dyn SecretProvider>,
        store: S,
        config: ShareConfig,
    ) -> Self {
        let codec = ShareTokenCodec::from_provider(provider, config.secret_name.clone());
        Self::new(codec, store, config)
    }

    /// Get the codec.
    pub fn codec(&self) -> &ShareTokenCodec {
        &self.codec
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Owner Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a share link for one of the owner's lists.
    ///
    /// The new token replaces any previously stored one, so older links to
    /// the same list stop working.
    pub async fn create_share_link(&self, owner: &UserId, list_id: &ListId) -> Result<ShareToken> {
        if self.store.get_list(owner, list_id).await?.is_none() {
            return Err(ShareError::ListNotFound(list_id.clone()));
        }

        let token = self.codec.encode(owner, list_id)?;

        let stored = self
            .store
            .set_share_token(owner, list_id, Some(token.as_str()), now_millis())
            .await?;
        if !stored {
            return Err(ShareError::ListNotFound(list_id.clone()));
        }

        info!(user = %owner, list = %list_id, "issued share link");
        Ok(token)
    }

    /// Revoke the current share link of a list.
    pub async fn revoke_share_link(&self, owner: &UserId, list_id: &ListId) -> Result<()> {
        let cleared = self
            .store
            .set_share_token(owner, list_id, None, now_millis())
            .await?;
        if !cleared {
            return Err(ShareError::ListNotFound(list_id.clone()));
        }

        info!(user = %owner, list = %list_id, "revoked share link");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bearer Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a presented token and return what it grants access to.
    pub async fn authorize(&self, token: &str) -> Result<SharePayload> {
        let (payload, _) = self.authorize_list(token).await?;
        Ok(payload)
    }

    /// The list, items and categories behind a share token.
    pub async fn shared_list(&self, token: &str) -> Result<SharedListView> {
        let (payload, list) = self.authorize_list(token).await?;

        let items = self
            .store
            .list_items(payload.user_id(), payload.list_id())
            .await?;
        let categories = self.store.list_categories(payload.user_id()).await?;

        Ok(SharedListView {
            list,
            items,
            categories,
        })
    }

    /// Check or uncheck an item on a shared list.
    pub async fn toggle_shared_item(
        &self,
        token: &str,
        item_id: &ItemId,
        checked: bool,
    ) -> Result<ListItem> {
        let (payload, _) = self.authorize_list(token).await?;

        let item = self
            .store
            .toggle_item(
                payload.user_id(),
                payload.list_id(),
                item_id,
                checked,
                now_millis(),
            )
            .await?
            .ok_or_else(|| ShareError::ItemNotFound(item_id.clone()))?;

        debug!(list = %payload.list_id(), item = %item_id, checked, "toggled shared item");
        Ok(item)
    }

    /// Decode the token, apply the age policy, and confirm it is still the
    /// list's current token.
    async fn authorize_list(&self, token: &str) -> Result<(SharePayload, ShoppingList)> {
        let payload = self.codec.decode(token)?.ok_or(ShareError::Unauthorized)?;

        if let Some(max_age) = self.config.max_token_age_millis() {
            let age = payload.age_millis(now_millis());
            if age > max_age {
                warn!(list = %payload.list_id(), age_ms = age, "expired share token");
                return Err(ShareError::Unauthorized);
            }
        }

        let list = self
            .store
            .get_list(payload.user_id(), payload.list_id())
            .await?
            .ok_or(ShareError::Unauthorized)?;

        if list.share_token.as_deref() != Some(token) {
            warn!(list = %payload.list_id(), "superseded or revoked share token");
            return Err(ShareError::Unauthorized);
        }

        Ok((payload, list))
    }
}
