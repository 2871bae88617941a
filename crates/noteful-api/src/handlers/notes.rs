//! Note HTTP handlers.
//!
//! Notes are always returned folded: one object per note with its folder
//! name and full tag list.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;

use noteful_core::{Note, NoteFilter, NoteInput, NoteRepository};

use super::{created, deserialize_id_list, deserialize_optional_id, parse_id_param, required_text};
use crate::{ApiError, AppState};

/// Query parameters for listing notes. Values stay raw so empty strings can
/// mean "no filter".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    pub search_term: Option<String>,
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
}

impl ListNotesQuery {
    pub fn into_filter(self) -> Result<NoteFilter, ApiError> {
        let mut filter = NoteFilter::new();
        if let Some(term) = self.search_term.filter(|t| !t.is_empty()) {
            filter = filter.search_term(term);
        }
        if let Some(folder_id) = parse_id_param("folderId", self.folder_id.as_deref())? {
            filter = filter.folder_id(folder_id);
        }
        if let Some(tag_id) = parse_id_param("tagId", self.tag_id.as_deref())? {
            filter = filter.tag_id(tag_id);
        }
        Ok(filter)
    }
}

/// Body of `POST /notes` and `PUT /notes/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, alias = "folder_id", deserialize_with = "deserialize_optional_id")]
    pub folder_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub tags: Vec<i64>,
}

impl NoteBody {
    pub fn into_input(self) -> Result<NoteInput, ApiError> {
        Ok(NoteInput {
            title: required_text(self.title, "title")?,
            content: self.content,
            folder_id: self.folder_id,
            tag_ids: self.tags,
        })
    }
}

/// List notes, optionally filtered.
///
/// # Query Parameters
/// - `searchTerm`: substring of the title
/// - `folderId`: only notes in this folder
/// - `tagId`: only notes carrying this tag (all of their tags are still returned)
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<ListNotesQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let notes = state.db.notes.list(filter).await?;
    Ok(Json(notes))
}

/// Get one note.
///
/// # Returns
/// - 200 OK with the folded note
/// - 404 Not Found if no note has this id
pub async fn get_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    let note = state
        .db
        .notes
        .fetch(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Note {} not found", id)))?;
    Ok(Json(note))
}

/// Create a note with its tag set.
///
/// # Returns
/// - 201 Created with `Location` and the folded note
/// - 400 Bad Request if `title` is missing or a tag id does not exist
pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<NoteBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let input = body.into_input()?;
    let note = state.db.notes.insert(input).await?;
    Ok(created(format!("/api/v1/notes/{}", note.id), note))
}

/// Replace a note's fields and tag set.
///
/// # Returns
/// - 200 OK with the folded note
/// - 400 Bad Request if `title` is missing or a tag id does not exist
/// - 404 Not Found if no note has this id
pub async fn update_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NoteBody>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let input = body.into_input()?;
    let note = state.db.notes.update(id, input).await?;
    Ok(Json(note))
}

/// Delete a note; its memberships go with it.
pub async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
