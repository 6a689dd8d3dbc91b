//! Store traits.
//!
//! Every call is owner-scoped except the public share lookup. Failures are
//! reported as [`ErrorKind::StoreUnavailable`](shelf_core::ErrorKind).

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::{Map, Value};

use shelf_core::result::AppResult;
use shelf_core::types::{FolderId, ItemId, UserId};
use shelf_entity::folder::FolderRecord;
use shelf_entity::item::{CreateItem, Item, ItemPatch, ItemQuery};
use shelf_entity::user::AccountUser;

/// Primary folder table.
#[async_trait]
pub trait FolderStore: Send + Sync + Debug + 'static {
    /// All folders of the owner, ordered by name.
    async fn list(&self, owner: UserId) -> AppResult<Vec<FolderRecord>>;

    /// A single folder of the owner.
    async fn find(&self, owner: UserId, id: FolderId) -> AppResult<Option<FolderRecord>>;

    /// Insert a folder and return the stored row.
    async fn insert(
        &self,
        owner: UserId,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<FolderRecord>;

    /// Rename a folder. `None` when it does not exist.
    async fn rename(
        &self,
        owner: UserId,
        id: FolderId,
        name: &str,
    ) -> AppResult<Option<FolderRecord>>;

    /// Change a folder's parent. `None` when it does not exist.
    async fn set_parent(
        &self,
        owner: UserId,
        id: FolderId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Option<FolderRecord>>;

    /// Delete the listed folders, returning how many rows went away.
    async fn delete_many(&self, owner: UserId, ids: &[FolderId]) -> AppResult<u64>;
}

/// Item table (prompts and bookmarks).
#[async_trait]
pub trait ItemStore: Send + Sync + Debug + 'static {
    /// Select with filter, order, and limit.
    async fn select(&self, query: &ItemQuery) -> AppResult<Vec<Item>>;

    /// A single item of the owner.
    async fn find(&self, owner: UserId, id: ItemId) -> AppResult<Option<Item>>;

    /// The item carrying `token`, only while it is public.
    async fn find_public_by_token(&self, token: &str) -> AppResult<Option<Item>>;

    /// Insert an item and return the stored row.
    async fn insert(&self, owner: UserId, data: &CreateItem) -> AppResult<Item>;

    /// Apply a patch. `None` when the item does not exist.
    async fn update(&self, owner: UserId, id: ItemId, patch: &ItemPatch)
    -> AppResult<Option<Item>>;

    /// Set `share_token` and `is_public` together in one write:
    /// `Some(token)` publishes, `None` revokes.
    async fn set_share(
        &self,
        owner: UserId,
        id: ItemId,
        token: Option<&str>,
    ) -> AppResult<Option<Item>>;

    /// Write a single item's `sort_order`. `false` when it does not exist.
    async fn set_sort_order(&self, owner: UserId, id: ItemId, sort_order: i32) -> AppResult<bool>;

    /// Delete an item. `false` when it does not exist.
    async fn delete(&self, owner: UserId, id: ItemId) -> AppResult<bool>;

    /// Unfile every item filed in one of `folder_ids`.
    async fn clear_folders(&self, owner: UserId, folder_ids: &[FolderId]) -> AppResult<u64>;

    /// The `folder_id` column of every item of the owner.
    async fn folder_refs(&self, owner: UserId) -> AppResult<Vec<Option<FolderId>>>;
}

/// Identity provider user records.
#[async_trait]
pub trait IdentityStore: Send + Sync + Debug + 'static {
    /// The account, if the provider knows it.
    async fn fetch_user(&self, id: UserId) -> AppResult<Option<AccountUser>>;

    /// Shallow-merge `patch` into the account metadata and return the
    /// updated account.
    async fn update_metadata(&self, id: UserId, patch: &Map<String, Value>)
    -> AppResult<AccountUser>;
}
