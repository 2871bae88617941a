//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use noteful_core::{Error, Folder, FolderRepository, Result};

use crate::errors::classify;

/// PostgreSQL implementation of FolderRepository.
pub struct PgFolderRepository {
    pool: Pool<Postgres>,
}

impl PgFolderRepository {
    /// Create a new PgFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn list(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>("SELECT id, name FROM folders ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "folders",
            op = "list",
            result_count = folders.len(),
            "Listed folders"
        );
        Ok(folders)
    }

    async fn get(&self, id: i64) -> Result<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT id, name FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn create(&self, name: &str) -> Result<Folder> {
        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        debug!(
            subsystem = "db",
            component = "folders",
            op = "create",
            folder_id = folder.id,
            "Created folder"
        );
        Ok(folder)
    }

    async fn update(&self, id: i64, name: &str) -> Result<Folder> {
        sqlx::query_as::<_, Folder>("UPDATE folders SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or_else(|| Error::NotFound(format!("Folder {} not found", id)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Notes keep their folder_id; it simply stops resolving to a name.
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Folder {} not found", id)));
        }

        debug!(
            subsystem = "db",
            component = "folders",
            op = "delete",
            folder_id = id,
            "Deleted folder"
        );
        Ok(())
    }
}
