//! # noteful-db
//!
//! PostgreSQL database layer for noteful.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for notes, folders, and tags
//! - The filtered, left-joined note query and its folding into nested notes
//! - Whole-set replacement of a note's tags
//! - Translation of constraint violations into domain errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use noteful_db::{Database, NoteFilter, NoteInput, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/noteful-app").await?;
//!
//!     let note = db.notes.insert(NoteInput {
//!         title: "Shopping list".to_string(),
//!         content: Some("milk, eggs".to_string()),
//!         folder_id: None,
//!         tag_ids: vec![1],
//!     }).await?;
//!
//!     let urgent = db.notes.list(NoteFilter::new().tag_id(1)).await?;
//!     println!("{} urgent notes, created {}", urgent.len(), note.id);
//!     Ok(())
//! }
//! ```
pub mod errors;
pub mod folders;
pub mod notes;
pub mod pool;
pub mod tags;

// Test fixtures for integration tests
// Note: Compiled outside cfg(test) so integration tests (in tests/) can use it
#[cfg(feature = "migrations")]
pub mod test_fixtures;

// Re-export core types
pub use noteful_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export repository implementations
pub use folders::PgFolderRepository;
pub use notes::PgNoteRepository;
pub use pool::{
    create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig,
};
pub use tags::PgTagRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository: filtered listing, hydration, tag reconciliation.
    pub notes: PgNoteRepository,
    /// Folder repository.
    pub folders: PgFolderRepository,
    /// Tag repository.
    pub tags: PgTagRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            folders: PgFolderRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Create an instance whose pool connects on first use.
    pub fn connect_lazy(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_lazy_pool(url, config)?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Round-trip a trivial query to check the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        log_pool_metrics(&self.pool);
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }

    #[test]
    fn test_escape_like_backslash_first() {
        assert_eq!(escape_like("a\\b%"), "a\\\\b\\%");
    }

    #[test]
    fn test_escape_like_plain_text_unchanged() {
        assert_eq!(escape_like("Shopping list"), "Shopping list");
    }
}
