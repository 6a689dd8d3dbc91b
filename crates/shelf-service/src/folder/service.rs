//! Folder CRUD operations with kind bookkeeping.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use shelf_core::config::FolderConfig;
use shelf_core::error::AppError;
use shelf_core::result::AppResult;
use shelf_core::traits::Service;
use shelf_core::types::{FolderId, Outcome, UserId};
use shelf_database::{FolderStore, IdentityStore};
use shelf_entity::folder::{Folder, FolderKind, FolderRecord};

use super::kinds::KindLedger;
use super::tree;
use crate::context::RequestContext;
use crate::item::ItemService;

/// Manages folder CRUD operations.
///
/// A folder's row lives in the folder store and its kind in the
/// [`KindLedger`]; this service keeps the two in step.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// Kind ledger over the identity store.
    kinds: KindLedger,
    /// Item service, for unfiling on delete.
    items: Arc<ItemService>,
    /// Folder settings.
    config: FolderConfig,
}

impl Service for FolderService {}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        identity: Arc<dyn IdentityStore>,
        items: Arc<ItemService>,
        config: FolderConfig,
    ) -> Self {
        Self {
            folders,
            kinds: KindLedger::new(identity),
            items,
            config,
        }
    }

    /// Lists every folder of the owner, ordered by name, each annotated
    /// with its kind.
    ///
    /// The row read and the kind read run concurrently; either failing
    /// fails the whole call.
    pub async fn list_folders(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        let owner = ctx.owner();
        let (records, website_ids) =
            tokio::try_join!(self.folders.list(owner), self.kinds.website_ids(owner))?;
        Ok(annotate(records, &website_ids))
    }

    /// Lists folders, first creating the bookmark root when the owner has
    /// no website folder yet.
    ///
    /// Safe to call repeatedly: a prompt root already carrying the bookmark
    /// root name is adopted instead of creating a second one.
    pub async fn load_folders(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        let folders = self.list_folders(ctx).await?;
        if folders.iter().any(Folder::is_website) {
            return Ok(folders);
        }

        let name = self.config.bookmark_root_name.trim();
        let adoptable = folders.iter().find(|f| f.is_root() && f.name == name).map(|f| f.id);

        let result = match adoptable {
            Some(id) => self.kinds.mark_website(ctx.owner(), id).await,
            None => match self
                .create_folder(ctx, name, None, FolderKind::Website)
                .await?
            {
                Outcome::Complete(_) => Ok(()),
                Outcome::Partial { error, .. } => Err(error),
            },
        };

        match result {
            Ok(()) => info!(user_id = %ctx.user_id, root = name, "Bookmark root ready"),
            Err(e) => warn!(
                user_id = %ctx.user_id,
                error = %e,
                "Bookmark root kind not recorded; will retry on next load"
            ),
        }

        self.list_folders(ctx).await
    }

    /// Gets a folder by ID, annotated with its kind.
    pub async fn get_folder(&self, ctx: &RequestContext, id: FolderId) -> AppResult<Folder> {
        let owner = ctx.owner();
        let (record, website_ids) =
            tokio::try_join!(self.folders.find(owner, id), self.kinds.website_ids(owner))?;
        let record = record.ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        let kind = kind_of(record.id, &website_ids);
        Ok(Folder::from_record(record, kind))
    }

    /// Creates a new folder.
    ///
    /// For a website folder the kind is recorded after the row is
    /// inserted. If that second write fails the folder still exists and the
    /// outcome is partial, carrying the folder as a prompt folder; retry
    /// with [`Self::record_kind`].
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
        kind: FolderKind,
    ) -> AppResult<Outcome<Folder>> {
        let owner = ctx.owner();
        let name = validate_name(name)?;

        if let Some(parent_id) = parent_id {
            self.require_parent(owner, parent_id).await?;
        }

        let record = self.folders.insert(owner, &name, parent_id).await?;
        let folder_id = record.id;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            kind = %kind,
            "Folder created"
        );

        if kind == FolderKind::Prompt {
            return Ok(Outcome::Complete(Folder::from_record(record, kind)));
        }

        match self.kinds.mark_website(owner, folder_id).await {
            Ok(()) => Ok(Outcome::Complete(Folder::from_record(record, kind))),
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    folder_id = %folder_id,
                    error = %e,
                    "Folder created but kind not recorded"
                );
                Ok(Outcome::partial(
                    Folder::from_record(record, FolderKind::Prompt),
                    "Recording folder kind",
                    e,
                ))
            }
        }
    }

    /// Records the kind of an existing folder.
    pub async fn record_kind(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        kind: FolderKind,
    ) -> AppResult<()> {
        let owner = ctx.owner();
        if self.folders.find(owner, id).await?.is_none() {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }
        self.kinds.set_kind(owner, id, kind).await?;
        info!(user_id = %ctx.user_id, folder_id = %id, kind = %kind, "Folder kind recorded");
        Ok(())
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        name: &str,
    ) -> AppResult<FolderRecord> {
        let name = validate_name(name)?;
        let record = self
            .folders
            .rename(ctx.owner(), id, &name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            folder_name = %record.name,
            "Folder renamed"
        );
        Ok(record)
    }

    /// Moves a folder under a new parent, or to the root with `None`.
    ///
    /// Rejects moving a folder into itself or one of its descendants.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        new_parent: Option<FolderId>,
    ) -> AppResult<FolderRecord> {
        let owner = ctx.owner();
        let folders: Vec<Folder> = self
            .folders
            .list(owner)
            .await?
            .into_iter()
            .map(|r| Folder::from_record(r, FolderKind::Prompt))
            .collect();

        if !folders.iter().any(|f| f.id == id) {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        if let Some(parent_id) = new_parent {
            if parent_id == id || tree::descendant_ids(id, &folders).contains(&parent_id) {
                return Err(AppError::validation(
                    "Cannot move a folder into itself or one of its subfolders",
                ));
            }
            if !folders.iter().any(|f| f.id == parent_id) {
                return Err(AppError::validation(format!(
                    "Parent folder {parent_id} not found"
                )));
            }
        }

        let record = self
            .folders
            .set_parent(owner, id, new_parent)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            parent_id = ?new_parent,
            "Folder moved"
        );
        Ok(record)
    }

    /// Deletes a folder and its whole subtree.
    ///
    /// The folders are removed first, which unfiles their items in the
    /// same store write. If that write fails nothing has changed. Their ids
    /// are then dropped from the kind ledger; only that step can leave a
    /// partial outcome. The value is every deleted folder id, the target
    /// first.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
    ) -> AppResult<Outcome<Vec<FolderId>>> {
        let owner = ctx.owner();
        let folders: Vec<Folder> = self
            .folders
            .list(owner)
            .await?
            .into_iter()
            .map(|r| Folder::from_record(r, FolderKind::Prompt))
            .collect();

        if !folders.iter().any(|f| f.id == id) {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        let mut subtree = vec![id];
        subtree.extend(tree::descendant_ids(id, &folders));

        self.folders.delete_many(owner, &subtree).await?;
        // The store unfiles items of deleted folders; this sweep only
        // repeats it.
        if let Err(e) = self.items.detach_folders(ctx, &subtree).await {
            warn!(
                user_id = %ctx.user_id,
                folder_id = %id,
                error = %e,
                "Unfile sweep after folder delete failed"
            );
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %id,
            removed = subtree.len(),
            "Folder deleted"
        );

        match self.kinds.forget(owner, &subtree).await {
            Ok(()) => Ok(Outcome::Complete(subtree)),
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    folder_id = %id,
                    error = %e,
                    "Folders deleted but kind cleanup failed"
                );
                Ok(Outcome::partial(subtree, "Folder kind cleanup", e))
            }
        }
    }

    async fn require_parent(&self, owner: UserId, parent_id: FolderId) -> AppResult<()> {
        match self.folders.find(owner, parent_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation(format!(
                "Parent folder {parent_id} not found"
            ))),
        }
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn kind_of(id: FolderId, website_ids: &HashSet<FolderId>) -> FolderKind {
    if website_ids.contains(&id) {
        FolderKind::Website
    } else {
        FolderKind::Prompt
    }
}

fn annotate(records: Vec<FolderRecord>, website_ids: &HashSet<FolderId>) -> Vec<Folder> {
    records
        .into_iter()
        .map(|record| {
            let kind = kind_of(record.id, website_ids);
            Folder::from_record(record, kind)
        })
        .collect()
}
