//! In-memory backend.
//!
//! Implements all three store traits over process memory. Used by the
//! service tests and for local runs without PostgreSQL. Supports failure
//! injection per operation, call counting, and an optional change
//! publisher that announces every mutation the way the PostgreSQL
//! triggers do.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use shelf_core::error::AppError;
use shelf_core::events::{ChangeEvent, ChangeKind, Table};
use shelf_core::result::AppResult;
use shelf_core::traits::ChangePublisher;
use shelf_core::types::{FolderId, ItemId, UserId};
use shelf_entity::folder::FolderRecord;
use shelf_entity::item::{CreateItem, Item, ItemOrder, ItemPatch, ItemQuery};
use shelf_entity::user::{AccountMetadata, AccountUser};

use crate::store::{FolderStore, IdentityStore, ItemStore};

/// A store operation that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// [`FolderStore::list`]
    FolderList,
    /// [`FolderStore::find`]
    FolderFind,
    /// [`FolderStore::insert`]
    FolderInsert,
    /// [`FolderStore::rename`]
    FolderRename,
    /// [`FolderStore::set_parent`]
    FolderSetParent,
    /// [`FolderStore::delete_many`]
    FolderDelete,
    /// [`ItemStore::select`]
    ItemSelect,
    /// [`ItemStore::find`]
    ItemFind,
    /// [`ItemStore::find_public_by_token`]
    ItemFindShared,
    /// [`ItemStore::insert`]
    ItemInsert,
    /// [`ItemStore::update`]
    ItemUpdate,
    /// [`ItemStore::set_share`]
    ItemSetShare,
    /// [`ItemStore::set_sort_order`]
    ItemSetSortOrder,
    /// [`ItemStore::delete`]
    ItemDelete,
    /// [`ItemStore::clear_folders`]
    ItemClearFolders,
    /// [`ItemStore::folder_refs`]
    ItemFolderRefs,
    /// [`IdentityStore::fetch_user`]
    IdentityFetch,
    /// [`IdentityStore::update_metadata`]
    IdentityUpdate,
}

#[derive(Debug, Default)]
struct State {
    folders: HashMap<FolderId, FolderRecord>,
    items: HashMap<ItemId, Item>,
    users: HashMap<UserId, AccountMetadata>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps so `created_at` ordering is total.
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp
            && now <= last
        {
            now = last + TimeDelta::microseconds(1);
        }
        self.last_timestamp = Some(now);
        now
    }
}

#[derive(Debug, Default)]
struct Faults {
    failing: HashSet<StoreOp>,
    failing_sort_orders: HashSet<ItemId>,
    select_delays: HashMap<String, Duration>,
}

/// Process-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    faults: Mutex<Faults>,
    calls: Mutex<HashMap<StoreOp, usize>>,
    selects: Mutex<Vec<ItemQuery>>,
    publisher: Option<Arc<dyn ChangePublisher>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MemoryBackend {
    /// Create an empty backend that announces nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend that publishes a [`ChangeEvent`] after every
    /// successful mutation.
    pub fn with_publisher(publisher: Arc<dyn ChangePublisher>) -> Self {
        Self {
            publisher: Some(publisher),
            ..Self::default()
        }
    }

    /// Make every subsequent call of `op` fail until [`Self::heal`].
    pub fn fail(&self, op: StoreOp) {
        lock(&self.faults).failing.insert(op);
    }

    /// Stop failing `op`.
    pub fn heal(&self, op: StoreOp) {
        lock(&self.faults).failing.remove(&op);
    }

    /// Make `set_sort_order` fail for one specific item.
    pub fn fail_sort_order_for(&self, id: ItemId) {
        lock(&self.faults).failing_sort_orders.insert(id);
    }

    /// Delay text selects whose `text` filter equals `text`.
    pub fn delay_select(&self, text: impl Into<String>, delay: Duration) {
        lock(&self.faults).select_delays.insert(text.into(), delay);
    }

    /// How many times `op` has been called, failed calls included.
    pub fn calls(&self, op: StoreOp) -> usize {
        lock(&self.calls).get(&op).copied().unwrap_or(0)
    }

    /// Every query passed to [`ItemStore::select`], in call order.
    pub fn recorded_selects(&self) -> Vec<ItemQuery> {
        lock(&self.selects).clone()
    }

    /// Reset call counters and the select log.
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
        lock(&self.selects).clear();
    }

    /// Snapshot of one item regardless of owner.
    pub fn item(&self, id: ItemId) -> Option<Item> {
        lock(&self.state).items.get(&id).cloned()
    }

    /// Snapshot of an account's metadata.
    pub fn metadata(&self, id: UserId) -> Option<AccountMetadata> {
        lock(&self.state).users.get(&id).cloned()
    }

    fn enter(&self, op: StoreOp) -> AppResult<()> {
        *lock(&self.calls).entry(op).or_insert(0) += 1;
        if lock(&self.faults).failing.contains(&op) {
            debug!(?op, "Injected store failure");
            return Err(AppError::store_unavailable(format!(
                "Injected failure for {op:?}"
            )));
        }
        Ok(())
    }

    fn announce(&self, table: Table, kind: ChangeKind, record_id: uuid::Uuid, owner: UserId) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(ChangeEvent::new(table, kind, Some(record_id), Some(owner)));
        }
    }
}

fn matches_query(item: &Item, query: &ItemQuery) -> bool {
    if item.owner_id != query.owner_id {
        return false;
    }
    if let Some(folder_ids) = &query.folder_ids
        && !item.folder_id.is_some_and(|id| folder_ids.contains(&id))
    {
        return false;
    }
    if let Some(text) = &query.text {
        let needle = text.to_lowercase();
        if !item.title.to_lowercase().contains(&needle)
            && !item.content.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if let Some(tag) = &query.tag
        && !item.has_tag(tag)
    {
        return false;
    }
    true
}

#[async_trait]
impl FolderStore for MemoryBackend {
    async fn list(&self, owner: UserId) -> AppResult<Vec<FolderRecord>> {
        self.enter(StoreOp::FolderList)?;
        let state = lock(&self.state);
        let mut folders: Vec<FolderRecord> = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(folders)
    }

    async fn find(&self, owner: UserId, id: FolderId) -> AppResult<Option<FolderRecord>> {
        self.enter(StoreOp::FolderFind)?;
        let state = lock(&self.state);
        Ok(state.folders.get(&id).filter(|f| f.owner_id == owner).cloned())
    }

    async fn insert(
        &self,
        owner: UserId,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<FolderRecord> {
        self.enter(StoreOp::FolderInsert)?;
        let record = {
            let mut state = lock(&self.state);
            let now = state.now();
            let record = FolderRecord {
                id: FolderId::new(),
                owner_id: owner,
                name: name.to_string(),
                parent_id,
                created_at: now,
                updated_at: now,
            };
            state.folders.insert(record.id, record.clone());
            record
        };
        self.announce(Table::Folders, ChangeKind::Insert, record.id.into_uuid(), owner);
        Ok(record)
    }

    async fn rename(
        &self,
        owner: UserId,
        id: FolderId,
        name: &str,
    ) -> AppResult<Option<FolderRecord>> {
        self.enter(StoreOp::FolderRename)?;
        let updated = {
            let mut state = lock(&self.state);
            let now = state.now();
            state
                .folders
                .get_mut(&id)
                .filter(|f| f.owner_id == owner)
                .map(|f| {
                    f.name = name.to_string();
                    f.updated_at = now;
                    f.clone()
                })
        };
        if updated.is_some() {
            self.announce(Table::Folders, ChangeKind::Update, id.into_uuid(), owner);
        }
        Ok(updated)
    }

    async fn set_parent(
        &self,
        owner: UserId,
        id: FolderId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Option<FolderRecord>> {
        self.enter(StoreOp::FolderSetParent)?;
        let updated = {
            let mut state = lock(&self.state);
            let now = state.now();
            state
                .folders
                .get_mut(&id)
                .filter(|f| f.owner_id == owner)
                .map(|f| {
                    f.parent_id = parent_id;
                    f.updated_at = now;
                    f.clone()
                })
        };
        if updated.is_some() {
            self.announce(Table::Folders, ChangeKind::Update, id.into_uuid(), owner);
        }
        Ok(updated)
    }

    async fn delete_many(&self, owner: UserId, ids: &[FolderId]) -> AppResult<u64> {
        self.enter(StoreOp::FolderDelete)?;
        let removed: Vec<FolderId> = {
            let mut state = lock(&self.state);
            let mut removed = Vec::new();
            for id in ids {
                if state.folders.get(id).is_some_and(|f| f.owner_id == owner) {
                    state.folders.remove(id);
                    removed.push(*id);
                }
            }
            // Mirror ON DELETE SET NULL for items of any owner.
            let gone: HashSet<FolderId> = removed.iter().copied().collect();
            for item in state.items.values_mut() {
                if item.folder_id.is_some_and(|id| gone.contains(&id)) {
                    item.folder_id = None;
                }
            }
            removed
        };
        for id in &removed {
            self.announce(Table::Folders, ChangeKind::Delete, id.into_uuid(), owner);
        }
        Ok(removed.len() as u64)
    }
}

#[async_trait]
impl ItemStore for MemoryBackend {
    async fn select(&self, query: &ItemQuery) -> AppResult<Vec<Item>> {
        lock(&self.selects).push(query.clone());
        let delay = query
            .text
            .as_ref()
            .and_then(|text| lock(&self.faults).select_delays.get(text).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.enter(StoreOp::ItemSelect)?;

        let state = lock(&self.state);
        let mut items: Vec<Item> = state
            .items
            .values()
            .filter(|item| matches_query(item, query))
            .cloned()
            .collect();
        match query.order {
            ItemOrder::Manual => items.sort_by(|a, b| {
                a.sort_order
                    .cmp(&b.sort_order)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
            ItemOrder::Recent => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        if let Some(limit) = query.limit {
            items.truncate(limit as usize);
        }
        Ok(items)
    }

    async fn find(&self, owner: UserId, id: ItemId) -> AppResult<Option<Item>> {
        self.enter(StoreOp::ItemFind)?;
        let state = lock(&self.state);
        Ok(state.items.get(&id).filter(|i| i.owner_id == owner).cloned())
    }

    async fn find_public_by_token(&self, token: &str) -> AppResult<Option<Item>> {
        self.enter(StoreOp::ItemFindShared)?;
        let state = lock(&self.state);
        Ok(state
            .items
            .values()
            .find(|i| i.is_public && i.share_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, owner: UserId, data: &CreateItem) -> AppResult<Item> {
        self.enter(StoreOp::ItemInsert)?;
        let item = {
            let mut state = lock(&self.state);
            let now = state.now();
            let item = Item {
                id: ItemId::new(),
                owner_id: owner,
                folder_id: data.folder_id,
                title: data.title.clone(),
                content: data.content.clone(),
                tags: data.tags.clone(),
                image_url: data.image_url.clone(),
                link_url: data.link_url.clone(),
                sort_order: data.sort_order,
                is_public: false,
                share_token: None,
                created_at: now,
                updated_at: now,
            };
            state.items.insert(item.id, item.clone());
            item
        };
        self.announce(Table::Items, ChangeKind::Insert, item.id.into_uuid(), owner);
        Ok(item)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ItemId,
        patch: &ItemPatch,
    ) -> AppResult<Option<Item>> {
        self.enter(StoreOp::ItemUpdate)?;
        let updated = {
            let mut state = lock(&self.state);
            let now = state.now();
            state
                .items
                .get_mut(&id)
                .filter(|i| i.owner_id == owner)
                .map(|item| {
                    item.apply_patch(patch);
                    item.updated_at = now;
                    item.clone()
                })
        };
        if updated.is_some() {
            self.announce(Table::Items, ChangeKind::Update, id.into_uuid(), owner);
        }
        Ok(updated)
    }

    async fn set_share(
        &self,
        owner: UserId,
        id: ItemId,
        token: Option<&str>,
    ) -> AppResult<Option<Item>> {
        self.enter(StoreOp::ItemSetShare)?;
        let updated = {
            let mut state = lock(&self.state);
            if let Some(token) = token
                && state
                    .items
                    .values()
                    .any(|i| i.id != id && i.share_token.as_deref() == Some(token))
            {
                return Err(AppError::store_unavailable(
                    "Share token already in use",
                ));
            }
            let now = state.now();
            state
                .items
                .get_mut(&id)
                .filter(|i| i.owner_id == owner)
                .map(|item| {
                    item.is_public = token.is_some();
                    item.share_token = token.map(str::to_string);
                    item.updated_at = now;
                    item.clone()
                })
        };
        if updated.is_some() {
            self.announce(Table::Items, ChangeKind::Update, id.into_uuid(), owner);
        }
        Ok(updated)
    }

    async fn set_sort_order(&self, owner: UserId, id: ItemId, sort_order: i32) -> AppResult<bool> {
        self.enter(StoreOp::ItemSetSortOrder)?;
        if lock(&self.faults).failing_sort_orders.contains(&id) {
            return Err(AppError::store_unavailable(format!(
                "Injected sort order failure for {id}"
            )));
        }
        let found = {
            let mut state = lock(&self.state);
            let now = state.now();
            match state.items.get_mut(&id).filter(|i| i.owner_id == owner) {
                Some(item) => {
                    item.sort_order = sort_order;
                    item.updated_at = now;
                    true
                }
                None => false,
            }
        };
        if found {
            self.announce(Table::Items, ChangeKind::Update, id.into_uuid(), owner);
        }
        Ok(found)
    }

    async fn delete(&self, owner: UserId, id: ItemId) -> AppResult<bool> {
        self.enter(StoreOp::ItemDelete)?;
        let removed = {
            let mut state = lock(&self.state);
            if state.items.get(&id).is_some_and(|i| i.owner_id == owner) {
                state.items.remove(&id);
                true
            } else {
                false
            }
        };
        if removed {
            self.announce(Table::Items, ChangeKind::Delete, id.into_uuid(), owner);
        }
        Ok(removed)
    }

    async fn clear_folders(&self, owner: UserId, folder_ids: &[FolderId]) -> AppResult<u64> {
        self.enter(StoreOp::ItemClearFolders)?;
        let cleared: Vec<ItemId> = {
            let mut state = lock(&self.state);
            let now = state.now();
            state
                .items
                .values_mut()
                .filter(|i| {
                    i.owner_id == owner && i.folder_id.is_some_and(|id| folder_ids.contains(&id))
                })
                .map(|item| {
                    item.folder_id = None;
                    item.updated_at = now;
                    item.id
                })
                .collect()
        };
        for id in &cleared {
            self.announce(Table::Items, ChangeKind::Update, id.into_uuid(), owner);
        }
        Ok(cleared.len() as u64)
    }

    async fn folder_refs(&self, owner: UserId) -> AppResult<Vec<Option<FolderId>>> {
        self.enter(StoreOp::ItemFolderRefs)?;
        let state = lock(&self.state);
        Ok(state
            .items
            .values()
            .filter(|i| i.owner_id == owner)
            .map(|i| i.folder_id)
            .collect())
    }
}

#[async_trait]
impl IdentityStore for MemoryBackend {
    async fn fetch_user(&self, id: UserId) -> AppResult<Option<AccountUser>> {
        self.enter(StoreOp::IdentityFetch)?;
        let state = lock(&self.state);
        Ok(state.users.get(&id).map(|metadata| AccountUser {
            id,
            metadata: metadata.clone(),
        }))
    }

    async fn update_metadata(
        &self,
        id: UserId,
        patch: &Map<String, Value>,
    ) -> AppResult<AccountUser> {
        self.enter(StoreOp::IdentityUpdate)?;
        let mut state = lock(&self.state);
        let merged = state.users.get(&id).cloned().unwrap_or_default().merge(patch);
        state.users.insert(id, merged.clone());
        Ok(AccountUser {
            id,
            metadata: merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, folder_id: Option<FolderId>) -> CreateItem {
        CreateItem {
            folder_id,
            title: title.to_string(),
            content: format!("{title} body"),
            ..CreateItem::default()
        }
    }

    #[tokio::test]
    async fn test_select_orders_manual_then_newest() {
        let store = MemoryBackend::new();
        let owner = UserId::new();
        let first = ItemStore::insert(&store, owner, &draft("first", None)).await.unwrap();
        let second = ItemStore::insert(&store, owner, &draft("second", None)).await.unwrap();
        let pinned = ItemStore::insert(
            &store,
            owner,
            &CreateItem {
                sort_order: -1,
                ..draft("pinned", None)
            },
        )
        .await
        .unwrap();

        let items = store.select(&ItemQuery::for_owner(owner)).await.unwrap();
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![pinned.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_select_is_owner_scoped() {
        let store = MemoryBackend::new();
        let alice = UserId::new();
        let bob = UserId::new();
        ItemStore::insert(&store, alice, &draft("mine", None)).await.unwrap();

        let items = store.select(&ItemQuery::for_owner(bob)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_text_filter_is_case_insensitive() {
        let store = MemoryBackend::new();
        let owner = UserId::new();
        ItemStore::insert(&store, owner, &draft("Rust Notes", None)).await.unwrap();

        let query = ItemQuery::for_owner(owner).matching_text("rust");
        assert_eq!(store.select(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_and_counter() {
        let store = MemoryBackend::new();
        let owner = UserId::new();
        store.fail(StoreOp::FolderList);

        let err = FolderStore::list(&store, owner).await.unwrap_err();
        assert!(err.is(shelf_core::ErrorKind::StoreUnavailable));
        assert_eq!(store.calls(StoreOp::FolderList), 1);

        store.heal(StoreOp::FolderList);
        assert!(FolderStore::list(&store, owner).await.unwrap().is_empty());
        assert_eq!(store.calls(StoreOp::FolderList), 2);
    }

    #[tokio::test]
    async fn test_deleting_folder_unfiles_items() {
        let store = MemoryBackend::new();
        let owner = UserId::new();
        let folder = FolderStore::insert(&store, owner, "Work", None).await.unwrap();
        let item = ItemStore::insert(&store, owner, &draft("memo", Some(folder.id)))
            .await
            .unwrap();

        store.delete_many(owner, &[folder.id]).await.unwrap();
        assert_eq!(store.item(item.id).unwrap().folder_id, None);
    }

    #[tokio::test]
    async fn test_share_lookup_requires_public() {
        let store = MemoryBackend::new();
        let owner = UserId::new();
        let item = ItemStore::insert(&store, owner, &draft("memo", None)).await.unwrap();
        store.set_share(owner, item.id, Some("tok")).await.unwrap();
        assert!(store.find_public_by_token("tok").await.unwrap().is_some());

        store.set_share(owner, item.id, None).await.unwrap();
        assert!(store.find_public_by_token("tok").await.unwrap().is_none());
        assert!(store.item(item.id).unwrap().share_state_consistent());
    }

    #[tokio::test]
    async fn test_metadata_merge_keeps_other_keys() {
        let store = MemoryBackend::new();
        let user = UserId::new();
        let mut patch = Map::new();
        patch.insert("theme".to_string(), Value::from("dark"));
        store.update_metadata(user, &patch).await.unwrap();

        let mut patch = Map::new();
        patch.insert("website_folder_ids".to_string(), Value::Array(vec![]));
        let account = store.update_metadata(user, &patch).await.unwrap();
        assert_eq!(account.metadata.extra.get("theme"), Some(&Value::from("dark")));
    }
}
