//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use shelf_core::result::AppResult;
use shelf_core::types::{FolderId, UserId};
use shelf_entity::folder::FolderRecord;

use super::store_error;
use crate::store::FolderStore;

/// Folder table backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFolderStore {
    pool: PgPool,
}

impl PgFolderStore {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for PgFolderStore {
    async fn list(&self, owner: UserId) -> AppResult<Vec<FolderRecord>> {
        sqlx::query_as::<_, FolderRecord>(
            "SELECT * FROM folders WHERE owner_id = $1 ORDER BY name ASC, id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to list folders"))
    }

    async fn find(&self, owner: UserId, id: FolderId) -> AppResult<Option<FolderRecord>> {
        sqlx::query_as::<_, FolderRecord>("SELECT * FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("Failed to find folder"))
    }

    async fn insert(
        &self,
        owner: UserId,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<FolderRecord> {
        sqlx::query_as::<_, FolderRecord>(
            "INSERT INTO folders (owner_id, name, parent_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(owner)
        .bind(name)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("Failed to create folder"))
    }

    async fn rename(
        &self,
        owner: UserId,
        id: FolderId,
        name: &str,
    ) -> AppResult<Option<FolderRecord>> {
        sqlx::query_as::<_, FolderRecord>(
            "UPDATE folders SET name = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to rename folder"))
    }

    async fn set_parent(
        &self,
        owner: UserId,
        id: FolderId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Option<FolderRecord>> {
        sqlx::query_as::<_, FolderRecord>(
            "UPDATE folders SET parent_id = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to move folder"))
    }

    async fn delete_many(&self, owner: UserId, ids: &[FolderId]) -> AppResult<u64> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let result = sqlx::query("DELETE FROM folders WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(store_error("Failed to delete folders"))?;
        Ok(result.rows_affected())
    }
}
