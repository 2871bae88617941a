//! Domain models for folders, tags, and notes.

use serde::{Deserialize, Serialize};

/// A folder notes can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Folder {
    pub id: i64,
    pub name: String,
}

/// A tag definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A note with its folder name and tag list attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    /// Weak reference; may point at a folder that no longer exists.
    pub folder_id: Option<i64>,
    /// `None` when the note has no folder or the folder is gone.
    pub folder_name: Option<String>,
    pub tags: Vec<Tag>,
}

/// One row of the note × tag left join.
///
/// A note with three tags produces three rows sharing the note columns;
/// a note without tags produces a single row whose tag columns are null.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<i64>,
    pub folder_name: Option<String>,
    pub tag_id: Option<i64>,
    pub tag_name: Option<String>,
}

/// Criteria for listing notes. Every field is optional; present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Substring that must appear in the title.
    pub search_term: Option<String>,
    /// Exact folder id match.
    pub folder_id: Option<i64>,
    /// Notes carrying this tag (other tags allowed).
    pub tag_id: Option<i64>,
    /// Restrict to a single note; used by fetch.
    pub note_id: Option<i64>,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn folder_id(mut self, id: i64) -> Self {
        self.folder_id = Some(id);
        self
    }

    pub fn tag_id(mut self, id: i64) -> Self {
        self.tag_id = Some(id);
        self
    }

    pub fn note_id(mut self, id: i64) -> Self {
        self.note_id = Some(id);
        self
    }
}

/// Writable fields of a note, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<i64>,
    /// Full tag set; replaces whatever the note carried before.
    pub tag_ids: Vec<i64>,
}
