//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use noteful_core::{Error, Result, Tag, TagRepository};

use crate::errors::classify;

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "tags",
            op = "list",
            result_count = tags.len(),
            "Listed tags"
        );
        Ok(tags)
    }

    async fn get(&self, id: i64) -> Result<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn create(&self, name: &str) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        debug!(
            subsystem = "db",
            component = "tags",
            op = "create",
            tag_id = tag.id,
            "Created tag"
        );
        Ok(tag)
    }

    async fn update(&self, id: i64, name: &str) -> Result<Tag> {
        sqlx::query_as::<_, Tag>("UPDATE tags SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or_else(|| Error::NotFound(format!("Tag {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Memberships go with it (ON DELETE CASCADE), so tag filters stop matching.
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Tag {} not found", id)));
        }

        debug!(
            subsystem = "db",
            component = "tags",
            op = "delete",
            tag_id = id,
            "Deleted tag"
        );
        Ok(())
    }
}
