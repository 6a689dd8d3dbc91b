//! Folder kind ledger.
//!
//! The folder table has no kind column. Website folders are listed by id in
//! the owner's account metadata under `website_folder_ids`; every other
//! folder is a prompt folder. Writes are read-merge-write against the
//! identity store, so concurrent writers race and the last one wins.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Map;
use tracing::debug;

use shelf_core::result::AppResult;
use shelf_core::types::{FolderId, UserId};
use shelf_database::IdentityStore;
use shelf_entity::folder::FolderKind;
use shelf_entity::user::WEBSITE_FOLDER_IDS_KEY;

/// Reads and writes folder kinds kept in account metadata.
#[derive(Debug, Clone)]
pub struct KindLedger {
    /// Identity store holding the metadata.
    identity: Arc<dyn IdentityStore>,
}

impl KindLedger {
    /// Creates a new kind ledger.
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self { identity }
    }

    /// Folder ids recorded as website folders.
    pub async fn website_ids(&self, owner: UserId) -> AppResult<HashSet<FolderId>> {
        Ok(self.load(owner).await?.into_iter().collect())
    }

    /// Record the kind of one folder.
    pub async fn set_kind(&self, owner: UserId, id: FolderId, kind: FolderKind) -> AppResult<()> {
        match kind {
            FolderKind::Website => self.mark_website(owner, id).await,
            FolderKind::Prompt => self.forget(owner, &[id]).await,
        }
    }

    /// Add `id` to the website list. No write when it is already there.
    pub async fn mark_website(&self, owner: UserId, id: FolderId) -> AppResult<()> {
        let mut ids = self.load(owner).await?;
        if ids.contains(&id) {
            return Ok(());
        }
        ids.push(id);
        self.store(owner, &ids).await
    }

    /// Drop `removed` from the website list. No write when none were there.
    pub async fn forget(&self, owner: UserId, removed: &[FolderId]) -> AppResult<()> {
        let ids = self.load(owner).await?;
        let kept: Vec<FolderId> = ids
            .iter()
            .copied()
            .filter(|id| !removed.contains(id))
            .collect();
        if kept.len() == ids.len() {
            return Ok(());
        }
        self.store(owner, &kept).await
    }

    async fn load(&self, owner: UserId) -> AppResult<Vec<FolderId>> {
        Ok(self
            .identity
            .fetch_user(owner)
            .await?
            .map(|user| user.metadata.website_folder_ids)
            .unwrap_or_default())
    }

    async fn store(&self, owner: UserId, ids: &[FolderId]) -> AppResult<()> {
        let mut patch = Map::new();
        patch.insert(WEBSITE_FOLDER_IDS_KEY.to_string(), serde_json::to_value(ids)?);
        self.identity.update_metadata(owner, &patch).await?;
        debug!(user_id = %owner, count = ids.len(), "Website folder list written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_database::{MemoryBackend, StoreOp};

    #[tokio::test]
    async fn test_website_ids_written_under_metadata_key() {
        let store = Arc::new(MemoryBackend::new());
        let ledger = KindLedger::new(store.clone());
        let owner = UserId::new();
        let id = FolderId::new();

        ledger.mark_website(owner, id).await.unwrap();
        ledger.mark_website(owner, id).await.unwrap();
        assert_eq!(store.calls(StoreOp::IdentityUpdate), 1);

        let meta = store.metadata(owner).unwrap();
        assert_eq!(meta.website_folder_ids, vec![id]);
        assert!(!meta.extra.contains_key(WEBSITE_FOLDER_IDS_KEY));
        assert!(ledger.website_ids(owner).await.unwrap().contains(&id));
    }

    #[tokio::test]
    async fn test_prompt_kind_forgets_id() {
        let store = Arc::new(MemoryBackend::new());
        let ledger = KindLedger::new(store.clone());
        let owner = UserId::new();
        let id = FolderId::new();

        ledger.set_kind(owner, id, FolderKind::Website).await.unwrap();
        ledger.set_kind(owner, id, FolderKind::Prompt).await.unwrap();
        assert!(ledger.website_ids(owner).await.unwrap().is_empty());

        ledger.forget(owner, &[FolderId::new()]).await.unwrap();
        assert_eq!(store.calls(StoreOp::IdentityUpdate), 2);
    }
}
