//! Note repository implementation.
//!
//! Notes are read through one left-joined query (note → folder, note →
//! memberships → tags) that yields a flat row per (note, tag) pair; the rows
//! are then folded into nested [`Note`]s by [`fold_note_rows`].

use std::collections::HashSet;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use tracing::debug;

use noteful_core::{
    fold_note_rows, Error, Note, NoteFilter, NoteInput, NoteRepository, NoteRow, Result,
};

use crate::errors::classify;
use crate::escape_like;

/// Flat note × tag projection shared by every read.
const NOTE_ROWS_SELECT: &str = r#"
    SELECT
        n.id, n.title, n.content, n.folder_id,
        f.name AS folder_name,
        t.id AS tag_id, t.name AS tag_name
    FROM notes n
    LEFT JOIN folders f ON f.id = n.folder_id
    LEFT JOIN notes_tags nt ON nt.note_id = n.id
    LEFT JOIN tags t ON t.id = nt.tag_id
    WHERE TRUE
"#;

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// HELPER FUNCTIONS FOR LIST QUERY BUILDING
// =============================================================================

/// Search term to match, ignoring empty strings (the client sends `""` for "no search").
fn effective_search_term(filter: &NoteFilter) -> Option<&str> {
    filter.search_term.as_deref().filter(|t| !t.is_empty())
}

/// Build the flat-row query for `filter`.
///
/// Placeholders are numbered in the order search term, folder, tag, note;
/// `bind_filter_params!` binds in the same order.
fn build_note_rows_query(filter: &NoteFilter) -> String {
    let mut query = String::from(NOTE_ROWS_SELECT);
    let mut param_idx = 1;

    if effective_search_term(filter).is_some() {
        query.push_str(&format!(
            "AND n.title LIKE '%' || ${} || '%' ESCAPE '\\' ",
            param_idx
        ));
        param_idx += 1;
    }
    if filter.folder_id.is_some() {
        query.push_str(&format!("AND n.folder_id = ${} ", param_idx));
        param_idx += 1;
    }
    if filter.tag_id.is_some() {
        // Semi-join: the tag only has to be present, and the hydration join
        // above still sees every tag of the note.
        query.push_str(&format!(
            "AND EXISTS (SELECT 1 FROM notes_tags ft WHERE ft.note_id = n.id AND ft.tag_id = ${}) ",
            param_idx
        ));
        param_idx += 1;
    }
    if filter.note_id.is_some() {
        query.push_str(&format!("AND n.id = ${} ", param_idx));
    }

    query.push_str("ORDER BY n.id ASC, t.id ASC");
    query
}

/// Macro to bind NoteFilter parameters to a query, in placeholder order.
macro_rules! bind_filter_params {
    ($query:expr, $filter:expr) => {{
        let mut q = $query;
        if let Some(term) = effective_search_term($filter) {
            q = q.bind(escape_like(term));
        }
        if let Some(folder_id) = $filter.folder_id {
            q = q.bind(folder_id);
        }
        if let Some(tag_id) = $filter.tag_id {
            q = q.bind(tag_id);
        }
        if let Some(note_id) = $filter.note_id {
            q = q.bind(note_id);
        }
        q
    }};
}

/// Collapse duplicate tag ids, keeping first-seen order.
fn distinct_tag_ids(tag_ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(tag_ids.len());
    tag_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, filter: NoteFilter) -> Result<Vec<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.list_tx(&mut tx, &filter).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.fetch_tx(&mut tx, id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn insert(&self, input: NoteInput) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.insert_tx(&mut tx, input).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn update(&self, id: i64, input: NoteInput) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.update_tx(&mut tx, id, input).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.delete_tx(&mut tx, id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn replace_tags(&self, note_id: i64, tag_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.replace_tags_tx(&mut tx, note_id, tag_ids).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}

// =============================================================================
// TRANSACTION-AWARE VARIANTS
// =============================================================================

impl PgNoteRepository {
    /// List hydrated notes within an existing transaction.
    pub async fn list_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>> {
        let start = Instant::now();
        let query = build_note_rows_query(filter);

        let rows: Vec<NoteRow> = {
            let q = sqlx::query_as::<_, NoteRow>(&query);
            let q = bind_filter_params!(q, filter);
            q.fetch_all(&mut **tx).await.map_err(Error::Database)?
        };
        let row_count = rows.len();
        let notes = fold_note_rows(rows);

        debug!(
            subsystem = "db",
            component = "notes",
            op = "list",
            has_search_term = effective_search_term(filter).is_some(),
            folder_id = filter.folder_id,
            tag_id = filter.tag_id,
            row_count,
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(notes)
    }

    /// Fetch one hydrated note within an existing transaction.
    ///
    /// A note without tags comes back with an empty tag list; `None` means
    /// no note has this id.
    pub async fn fetch_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<Option<Note>> {
        let filter = NoteFilter::new().note_id(id);
        let notes = self.list_tx(tx, &filter).await?;
        Ok(notes.into_iter().next())
    }

    /// Insert a note and its tag set within an existing transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        input: NoteInput,
    ) -> Result<Note> {
        let note_id: i64 = sqlx::query_scalar(
            "INSERT INTO notes (title, content, folder_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.folder_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(classify)?;

        self.replace_tags_tx(tx, note_id, &input.tag_ids).await?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            note_id,
            tag_count = input.tag_ids.len(),
            "Inserted note"
        );

        self.fetch_tx(tx, note_id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Note {} vanished after insert", note_id)))
    }

    /// Update a note and replace its tag set within an existing transaction.
    pub async fn update_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        input: NoteInput,
    ) -> Result<Note> {
        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE notes SET title = $1, content = $2, folder_id = $3 WHERE id = $4 RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.folder_id)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(classify)?;

        if updated.is_none() {
            return Err(Error::NotFound(format!("Note {} not found", id)));
        }

        self.replace_tags_tx(tx, id, &input.tag_ids).await?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "update",
            note_id = id,
            tag_count = input.tag_ids.len(),
            "Updated note"
        );

        self.fetch_tx(tx, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }

    /// Delete a note within an existing transaction. Memberships cascade.
    pub async fn delete_tx(&self, tx: &mut Transaction<'_, Postgres>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Note {} not found", id)));
        }

        debug!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = id,
            "Deleted note"
        );
        Ok(())
    }

    /// Replace a note's tag membership within an existing transaction.
    ///
    /// Deletes every membership of `note_id`, then inserts one row per
    /// distinct id in `tag_ids`. The result is the same whatever the prior
    /// state was. A tag id with no tag row fails with `InvalidReference`.
    ///
    /// The note row is locked first, so concurrent replacements on the same
    /// note run one after the other and the last one to commit wins.
    pub async fn replace_tags_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        note_id: i64,
        tag_ids: &[i64],
    ) -> Result<()> {
        let tag_ids = distinct_tag_ids(tag_ids);

        sqlx::query("SELECT id FROM notes WHERE id = $1 FOR UPDATE")
            .bind(note_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let removed = sqlx::query("DELETE FROM notes_tags WHERE note_id = $1")
            .bind(note_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO notes_tags (note_id, tag_id) SELECT $1, UNNEST($2::bigint[]) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(note_id)
            .bind(&tag_ids)
            .execute(&mut **tx)
            .await
            .map_err(classify)?;
        }

        debug!(
            subsystem = "db",
            component = "notes",
            op = "replace_tags",
            note_id,
            removed,
            inserted = tag_ids.len(),
            "Replaced note tags"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_query_has_no_placeholders() {
        let query = build_note_rows_query(&NoteFilter::default());
        assert!(!query.contains('$'));
        assert!(query.contains("LEFT JOIN folders f"));
        assert!(query.contains("LEFT JOIN tags t"));
        assert!(query.trim_end().ends_with("ORDER BY n.id ASC, t.id ASC"));
    }

    #[test]
    fn test_all_filters_numbered_in_bind_order() {
        let filter = NoteFilter::new()
            .search_term("Foo")
            .folder_id(1)
            .tag_id(2)
            .note_id(3);
        let query = build_note_rows_query(&filter);

        let like = query.find("n.title LIKE '%' || $1").expect("search term");
        let folder = query.find("n.folder_id = $2").expect("folder");
        let tag = query.find("ft.tag_id = $3").expect("tag");
        let note = query.find("n.id = $4").expect("note");
        assert!(like < folder && folder < tag && tag < note);
    }

    #[test]
    fn test_tag_filter_is_semi_join() {
        let query = build_note_rows_query(&NoteFilter::new().tag_id(9));
        assert!(query.contains("AND EXISTS (SELECT 1 FROM notes_tags ft"));
        assert!(query.contains("ft.tag_id = $1"));
        assert!(!query.contains("t.id = $1"));
    }

    #[test]
    fn test_folder_only_filter_starts_at_first_placeholder() {
        let query = build_note_rows_query(&NoteFilter::new().folder_id(4));
        assert!(query.contains("n.folder_id = $1"));
        assert!(!query.contains("$2"));
    }

    #[test]
    fn test_empty_search_term_is_ignored() {
        let query = build_note_rows_query(&NoteFilter::new().search_term(""));
        assert!(!query.contains("LIKE"));
    }

    #[test]
    fn test_like_escapes_backslash_literal() {
        let query = build_note_rows_query(&NoteFilter::new().search_term("50%"));
        assert!(query.contains("ESCAPE '\\'"));
    }

    #[test]
    fn test_distinct_tag_ids_keeps_first_seen_order() {
        assert_eq!(distinct_tag_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(distinct_tag_ids(&[]).is_empty());
    }
}
