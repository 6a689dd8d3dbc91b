//! Item CRUD, scoped listing, and reordering.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use shelf_core::error::AppError;
use shelf_core::result::AppResult;
use shelf_core::traits::Service;
use shelf_core::types::{FolderId, ItemId};
use shelf_database::{FolderStore, ItemStore};
use shelf_entity::item::{CreateItem, Item, ItemPatch, ItemQuery, Scope};

use super::reorder::ReorderReport;
use super::tags::normalize_tags;
use crate::context::RequestContext;

/// Manages prompts and bookmarks.
#[derive(Debug, Clone)]
pub struct ItemService {
    /// Item store.
    items: Arc<dyn ItemStore>,
    /// Folder store, for checking the folder an item is filed in.
    folders: Arc<dyn FolderStore>,
}

impl Service for ItemService {}

impl ItemService {
    /// Creates a new item service.
    pub fn new(items: Arc<dyn ItemStore>, folders: Arc<dyn FolderStore>) -> Self {
        Self { items, folders }
    }

    /// Lists items in `scope`, by `sort_order` then newest first.
    ///
    /// An empty folder scope matches nothing and never reaches the store.
    pub async fn list(&self, ctx: &RequestContext, scope: &Scope) -> AppResult<Vec<Item>> {
        let query = match scope {
            Scope::All => ItemQuery::for_owner(ctx.owner()),
            Scope::Folders(ids) if ids.is_empty() => {
                debug!(user_id = %ctx.user_id, "Empty scope, skipping item query");
                return Ok(Vec::new());
            }
            Scope::Folders(ids) => ItemQuery::for_owner(ctx.owner()).in_folders(ids.iter().copied()),
        };
        self.items.select(&query).await
    }

    /// Gets an item by ID.
    pub async fn get(&self, ctx: &RequestContext, id: ItemId) -> AppResult<Item> {
        self.items
            .find(ctx.owner(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))
    }

    /// Creates a new item.
    ///
    /// A target folder must be one of the owner's folders.
    pub async fn create(&self, ctx: &RequestContext, mut data: CreateItem) -> AppResult<Item> {
        data.title = validate_title(&data.title)?;
        data.tags = normalize_tags(data.tags);
        if let Some(folder_id) = data.folder_id {
            self.require_folder(ctx, folder_id).await?;
        }

        let item = self.items.insert(ctx.owner(), &data).await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item.id,
            folder_id = ?item.folder_id,
            "Item created"
        );
        Ok(item)
    }

    /// Applies a patch to an item.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ItemId,
        mut patch: ItemPatch,
    ) -> AppResult<Item> {
        if let Some(title) = &patch.title {
            patch.title = Some(validate_title(title)?);
        }
        if let Some(tags) = patch.tags.take() {
            patch.tags = Some(normalize_tags(tags));
        }
        if patch.is_empty() {
            return self.get(ctx, id).await;
        }
        if let Some(Some(folder_id)) = patch.folder_id {
            self.require_folder(ctx, folder_id).await?;
        }

        let item = self
            .items
            .update(ctx.owner(), id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;

        info!(user_id = %ctx.user_id, item_id = %id, "Item updated");
        Ok(item)
    }

    /// Deletes an item.
    pub async fn delete(&self, ctx: &RequestContext, id: ItemId) -> AppResult<()> {
        if !self.items.delete(ctx.owner(), id).await? {
            return Err(AppError::not_found(format!("Item {id} not found")));
        }
        info!(user_id = %ctx.user_id, item_id = %id, "Item deleted");
        Ok(())
    }

    /// Persists a new manual order.
    ///
    /// Each item's `sort_order` becomes its index in `ordered`. One write is
    /// issued per item, all concurrently; a failed write does not stop the
    /// others.
    pub async fn reorder(&self, ctx: &RequestContext, ordered: Vec<Item>) -> ReorderReport {
        let owner = ctx.owner();
        let items: Vec<Item> = ordered
            .into_iter()
            .enumerate()
            .map(|(position, mut item)| {
                item.sort_order = i32::try_from(position).unwrap_or(i32::MAX);
                item
            })
            .collect();

        let writes = items.iter().map(|item| async move {
            let result = self.items.set_sort_order(owner, item.id, item.sort_order).await;
            (item.id, result)
        });

        let failures: Vec<(ItemId, AppError)> = join_all(writes)
            .await
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(true) => None,
                Ok(false) => Some((id, AppError::not_found(format!("Item {id} not found")))),
                Err(e) => Some((id, e)),
            })
            .collect();

        if failures.is_empty() {
            info!(user_id = %ctx.user_id, count = items.len(), "Items reordered");
        } else {
            warn!(
                user_id = %ctx.user_id,
                failed = failures.len(),
                total = items.len(),
                "Reorder partially failed"
            );
        }

        ReorderReport { items, failures }
    }

    /// Unfiles every item in one of `folder_ids`.
    pub async fn detach_folders(
        &self,
        ctx: &RequestContext,
        folder_ids: &[FolderId],
    ) -> AppResult<u64> {
        if folder_ids.is_empty() {
            return Ok(0);
        }
        let cleared = self.items.clear_folders(ctx.owner(), folder_ids).await?;
        debug!(user_id = %ctx.user_id, cleared, "Items unfiled");
        Ok(cleared)
    }

    async fn require_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        match self.folders.find(ctx.owner(), folder_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation(format!(
                "Folder {folder_id} not found"
            ))),
        }
    }
}

fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Item title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ErrorKind;
    use shelf_core::types::UserId;
    use shelf_database::{MemoryBackend, StoreOp};

    fn setup() -> (Arc<MemoryBackend>, ItemService, RequestContext) {
        let store = Arc::new(MemoryBackend::new());
        let service = ItemService::new(store.clone(), store.clone());
        (store, service, RequestContext::new(UserId::new()))
    }

    fn draft(title: &str) -> CreateItem {
        CreateItem {
            title: title.to_string(),
            content: "body".to_string(),
            ..CreateItem::default()
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let (_, service, ctx) = setup();
        let err = service.create(&ctx, draft("   ")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_dedups_tags() {
        let (_, service, ctx) = setup();
        let item = service
            .create(
                &ctx,
                CreateItem {
                    tags: vec!["GPT".into(), "GPT".into(), " code ".into()],
                    ..draft("Summarize")
                },
            )
            .await
            .unwrap();
        assert_eq!(item.tags, vec!["GPT", "code"]);
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_folder() {
        let (store, service, ctx) = setup();
        let theirs = FolderStore::insert(&*store, UserId::new(), "Theirs", None)
            .await
            .unwrap();

        for folder_id in [theirs.id, FolderId::new()] {
            let err = service
                .create(
                    &ctx,
                    CreateItem {
                        folder_id: Some(folder_id),
                        ..draft("Stray")
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        assert_eq!(store.calls(StoreOp::ItemInsert), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_foreign_folder() {
        let (store, service, ctx) = setup();
        let mine = FolderStore::insert(&*store, ctx.owner(), "Mine", None)
            .await
            .unwrap();
        let theirs = FolderStore::insert(&*store, UserId::new(), "Theirs", None)
            .await
            .unwrap();
        let item = service
            .create(
                &ctx,
                CreateItem {
                    folder_id: Some(mine.id),
                    ..draft("Filed")
                },
            )
            .await
            .unwrap();

        let patch = ItemPatch {
            folder_id: Some(Some(theirs.id)),
            ..ItemPatch::default()
        };
        let err = service.update(&ctx, item.id, patch).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.item(item.id).unwrap().folder_id, Some(mine.id));

        let unfile = ItemPatch {
            folder_id: Some(None),
            ..ItemPatch::default()
        };
        let updated = service.update(&ctx, item.id, unfile).await.unwrap();
        assert_eq!(updated.folder_id, None);
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let (_, service, ctx) = setup();
        let item = service.create(&ctx, draft("Old")).await.unwrap();
        let patch = ItemPatch {
            title: Some("New".into()),
            ..ItemPatch::default()
        };
        let updated = service.update(&ctx, item.id, patch).await.unwrap();
        assert_eq!(updated.id, item.id);
        assert_eq!(updated.owner_id, item.owner_id);
        assert_eq!(updated.title, "New");
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let (_, service, ctx) = setup();
        let item = service.create(&ctx, draft("Keep")).await.unwrap();
        let patch = ItemPatch {
            title: Some(String::new()),
            ..ItemPatch::default()
        };
        let err = service.update(&ctx, item.id, patch).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch() {
        let (_, service, ctx) = setup();
        let item = service.create(&ctx, draft("Mine")).await.unwrap();
        let stranger = RequestContext::new(UserId::new());

        let err = service.delete(&stranger, item.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(service.get(&ctx, item.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_scope_skips_store() {
        let (store, service, ctx) = setup();
        service.create(&ctx, draft("Anything")).await.unwrap();

        let items = service.list(&ctx, &Scope::folders([])).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(store.calls(StoreOp::ItemSelect), 0);

        let all = service.list(&ctx, &Scope::All).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(store.calls(StoreOp::ItemSelect), 1);
    }

    #[tokio::test]
    async fn test_reorder_writes_positions() {
        let (store, service, ctx) = setup();
        let a = service.create(&ctx, draft("A")).await.unwrap();
        let b = service.create(&ctx, draft("B")).await.unwrap();
        let c = service.create(&ctx, draft("C")).await.unwrap();

        let report = service.reorder(&ctx, vec![c.clone(), a.clone(), b.clone()]).await;
        assert!(report.is_complete());
        assert_eq!(store.item(c.id).unwrap().sort_order, 0);
        assert_eq!(store.item(a.id).unwrap().sort_order, 1);
        assert_eq!(store.item(b.id).unwrap().sort_order, 2);

        let listed: Vec<ItemId> = service
            .list(&ctx, &Scope::All)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(listed, vec![c.id, a.id, b.id]);
    }

    #[tokio::test]
    async fn test_reorder_collects_failures() {
        let (store, service, ctx) = setup();
        let a = service.create(&ctx, draft("A")).await.unwrap();
        let b = service.create(&ctx, draft("B")).await.unwrap();
        store.fail_sort_order_for(a.id);

        let report = service.reorder(&ctx, vec![b.clone(), a.clone()]).await;
        assert_eq!(report.failed_ids(), vec![a.id]);
        assert_eq!(store.item(b.id).unwrap().sort_order, 0);

        let outcome = report.into_outcome();
        assert!(!outcome.is_complete());
        assert_eq!(outcome.value()[1].sort_order, 1);
        assert_eq!(outcome.into_result().unwrap_err().kind, ErrorKind::PartialFailure);
    }
}
