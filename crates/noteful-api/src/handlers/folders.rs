//! Folder HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use noteful_core::{Folder, FolderRepository};

use super::{created, required_text, NameBody};
use crate::{ApiError, AppState};

/// List all folders in id order.
pub async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>, ApiError> {
    let folders = state.db.folders.list().await?;
    Ok(Json(folders))
}

/// Get one folder.
pub async fn get_folder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Folder>, ApiError> {
    let Path(id) = id?;
    let folder = state
        .db
        .folders
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Folder {} not found", id)))?;
    Ok(Json(folder))
}

/// Create a folder.
///
/// # Returns
/// - 201 Created with `Location`
/// - 400 Bad Request if `name` is missing
/// - 409 Conflict if the name is taken
pub async fn create_folder(
    State(state): State<AppState>,
    body: Result<Json<NameBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let name = required_text(body.name, "name")?;
    let folder = state.db.folders.create(&name).await?;
    Ok(created(format!("/api/v1/folders/{}", folder.id), folder))
}

/// Rename a folder.
pub async fn update_folder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NameBody>, JsonRejection>,
) -> Result<Json<Folder>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let name = required_text(body.name, "name")?;
    let folder = state.db.folders.update(id, &name).await?;
    Ok(Json(folder))
}

/// Delete a folder. Notes filed in it keep their `folderId`.
pub async fn delete_folder(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.folders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
