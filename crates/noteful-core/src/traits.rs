//! Repository traits for noteful.
//!
//! These traits define the interfaces that concrete storage backends
//! must satisfy, keeping the HTTP layer independent of SQL.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Folder, Note, NoteFilter, NoteInput, Tag};

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD operations with folder and tag hydration.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List notes matching every criterion present in `filter`, ordered by id.
    async fn list(&self, filter: NoteFilter) -> Result<Vec<Note>>;

    /// Fetch a single hydrated note. `None` means the id matched no note.
    async fn fetch(&self, id: i64) -> Result<Option<Note>>;

    /// Insert a note and its tag set, returning the hydrated note.
    async fn insert(&self, input: NoteInput) -> Result<Note>;

    /// Update a note in place and replace its tag set.
    ///
    /// Returns `Error::NotFound` when `id` matches no note.
    async fn update(&self, id: i64, input: NoteInput) -> Result<Note>;

    /// Permanently delete a note. Returns `Error::NotFound` when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Replace the note's whole tag membership with `tag_ids` (treated as a set).
    async fn replace_tags(&self, note_id: i64, tag_ids: &[i64]) -> Result<()>;
}

// =============================================================================
// FOLDER REPOSITORY TRAITS
// =============================================================================

/// Repository for folder operations.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// List all folders, ordered by id.
    async fn list(&self) -> Result<Vec<Folder>>;

    /// Get a folder by id.
    async fn get(&self, id: i64) -> Result<Option<Folder>>;

    /// Create a folder. Duplicate names fail with `Error::Conflict`.
    async fn create(&self, name: &str) -> Result<Folder>;

    /// Rename a folder.
    async fn update(&self, id: i64, name: &str) -> Result<Folder>;

    /// Delete a folder. Notes filed under it keep their dangling folder id.
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// TAG REPOSITORY TRAITS
// =============================================================================

/// Repository for tag operations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags, ordered by id.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Get a tag by id.
    async fn get(&self, id: i64) -> Result<Option<Tag>>;

    /// Create a tag. Duplicate names fail with `Error::Conflict`.
    async fn create(&self, name: &str) -> Result<Tag>;

    /// Rename a tag.
    async fn update(&self, id: i64, name: &str) -> Result<Tag>;

    /// Delete a tag along with every membership that referenced it.
    async fn delete(&self, id: i64) -> Result<()>;
}
