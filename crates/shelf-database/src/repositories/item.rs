//! Item repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use shelf_core::result::AppResult;
use shelf_core::types::{FolderId, ItemId, UserId};
use shelf_entity::item::{CreateItem, Item, ItemOrder, ItemPatch, ItemQuery};

use super::store_error;
use crate::store::ItemStore;

/// Item table backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Create a new item repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape `ILIKE` wildcards so `text` matches literally.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn folder_uuids(ids: &[FolderId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.into_uuid()).collect()
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn select(&self, query: &ItemQuery) -> AppResult<Vec<Item>> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM items WHERE owner_id = ");
        qb.push_bind(query.owner_id);

        if let Some(folder_ids) = &query.folder_ids {
            qb.push(" AND folder_id = ANY(");
            qb.push_bind(folder_uuids(folder_ids));
            qb.push(")");
        }
        if let Some(text) = &query.text {
            let pattern = like_pattern(text);
            qb.push(" AND (title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR content ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(tag) = &query.tag {
            qb.push(" AND ");
            qb.push_bind(tag.clone());
            qb.push(" = ANY(tags)");
        }

        qb.push(match query.order {
            ItemOrder::Manual => " ORDER BY sort_order ASC, created_at DESC",
            ItemOrder::Recent => " ORDER BY created_at DESC",
        });

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        qb.build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("Failed to select items"))
    }

    async fn find(&self, owner: UserId, id: ItemId) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("Failed to find item"))
    }

    async fn find_public_by_token(&self, token: &str) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE share_token = $1 AND is_public = TRUE",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find shared item"))
    }

    async fn insert(&self, owner: UserId, data: &CreateItem) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items (owner_id, folder_id, title, content, tags, image_url, link_url, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(owner)
        .bind(data.folder_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.tags)
        .bind(&data.image_url)
        .bind(&data.link_url)
        .bind(data.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("Failed to create item"))
    }

    async fn update(
        &self,
        owner: UserId,
        id: ItemId,
        patch: &ItemPatch,
    ) -> AppResult<Option<Item>> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE items SET updated_at = NOW()");

        if let Some(folder_id) = patch.folder_id {
            qb.push(", folder_id = ");
            qb.push_bind(folder_id);
        }
        if let Some(title) = &patch.title {
            qb.push(", title = ");
            qb.push_bind(title.clone());
        }
        if let Some(content) = &patch.content {
            qb.push(", content = ");
            qb.push_bind(content.clone());
        }
        if let Some(tags) = &patch.tags {
            qb.push(", tags = ");
            qb.push_bind(tags.clone());
        }
        if let Some(image_url) = &patch.image_url {
            qb.push(", image_url = ");
            qb.push_bind(image_url.clone());
        }
        if let Some(link_url) = &patch.link_url {
            qb.push(", link_url = ");
            qb.push_bind(link_url.clone());
        }
        if let Some(sort_order) = patch.sort_order {
            qb.push(", sort_order = ");
            qb.push_bind(sort_order);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND owner_id = ");
        qb.push_bind(owner);
        qb.push(" RETURNING *");

        qb.build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("Failed to update item"))
    }

    async fn set_share(
        &self,
        owner: UserId,
        id: ItemId,
        token: Option<&str>,
    ) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(
            "UPDATE items SET is_public = $3, share_token = $4, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(token.is_some())
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to update item sharing"))
    }

    async fn set_sort_order(&self, owner: UserId, id: ItemId, sort_order: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE items SET sort_order = $3, updated_at = NOW() WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner)
        .bind(sort_order)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to reorder item"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, owner: UserId, id: ItemId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(store_error("Failed to delete item"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_folders(&self, owner: UserId, folder_ids: &[FolderId]) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE items SET folder_id = NULL, updated_at = NOW() \
             WHERE owner_id = $1 AND folder_id = ANY($2)",
        )
        .bind(owner)
        .bind(folder_uuids(folder_ids))
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to unfile items"))?;
        Ok(result.rows_affected())
    }

    async fn folder_refs(&self, owner: UserId) -> AppResult<Vec<Option<FolderId>>> {
        sqlx::query_scalar::<_, Option<FolderId>>("SELECT folder_id FROM items WHERE owner_id = $1")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("Failed to read item folders"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
