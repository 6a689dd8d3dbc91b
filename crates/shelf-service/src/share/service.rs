//! Share toggling and public lookup.

use std::sync::Arc;

use tracing::{debug, info};

use shelf_core::config::ShareConfig;
use shelf_core::error::AppError;
use shelf_core::result::AppResult;
use shelf_core::traits::Service;
use shelf_core::types::ItemId;
use shelf_database::ItemStore;
use shelf_entity::item::SharedItem;

use super::link::{generate_token, share_url};
use crate::context::RequestContext;

/// Manages share tokens on items.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Item store.
    items: Arc<dyn ItemStore>,
    /// Public link settings.
    config: ShareConfig,
}

impl Service for ShareService {}

impl ShareService {
    /// Creates a new share service.
    pub fn new(items: Arc<dyn ItemStore>, config: ShareConfig) -> Self {
        Self { items, config }
    }

    /// Turns sharing on or off.
    ///
    /// Enabling always mints a fresh token, even when the item was already
    /// shared, so a previously handed-out link stops working. The token and
    /// `is_public` are written together. Returns the token now in effect.
    pub async fn set_share(
        &self,
        ctx: &RequestContext,
        id: ItemId,
        enable: bool,
    ) -> AppResult<Option<String>> {
        let token = enable.then(generate_token);
        let item = self
            .items
            .set_share(ctx.owner(), id, token.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            item_id = %id,
            public = item.is_public,
            "Item sharing updated"
        );
        Ok(item.share_token)
    }

    /// Looks up a shared item by token.
    ///
    /// Unknown, revoked, and never-shared tokens all give `None`.
    pub async fn resolve_shared(&self, token: &str) -> AppResult<Option<SharedItem>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let item = self
            .items
            .find_public_by_token(token)
            .await?
            .filter(|item| item.is_public);
        debug!(found = item.is_some(), "Share lookup");
        Ok(item.map(SharedItem::from))
    }

    /// Public URL for `token`.
    pub fn share_url(&self, token: &str) -> String {
        share_url(&self.config.public_base_url, token)
    }

    /// Public URL of an item, if it is currently shared.
    pub async fn link_for(&self, ctx: &RequestContext, id: ItemId) -> AppResult<Option<String>> {
        let item = self
            .items
            .find(ctx.owner(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
        Ok(item
            .share_token
            .filter(|_| item.is_public)
            .map(|token| self.share_url(&token)))
    }
}
