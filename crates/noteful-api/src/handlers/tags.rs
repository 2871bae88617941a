//! Tag HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use noteful_core::{Tag, TagRepository};

use super::{created, required_text, NameBody};
use crate::{ApiError, AppState};

/// List all tags in id order.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.db.tags.list().await?;
    Ok(Json(tags))
}

/// Get one tag.
pub async fn get_tag(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Tag>, ApiError> {
    let Path(id) = id?;
    let tag = state
        .db
        .tags
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Tag {} not found", id)))?;
    Ok(Json(tag))
}

/// Create a tag. 409 if the name is taken.
pub async fn create_tag(
    State(state): State<AppState>,
    body: Result<Json<NameBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let name = required_text(body.name, "name")?;
    let tag = state.db.tags.create(&name).await?;
    Ok(created(format!("/api/v1/tags/{}", tag.id), tag))
}

/// Rename a tag. 409 if the new name is taken.
pub async fn update_tag(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NameBody>, JsonRejection>,
) -> Result<Json<Tag>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let name = required_text(body.name, "name")?;
    let tag = state.db.tags.update(id, &name).await?;
    Ok(Json(tag))
}

/// Delete a tag and every membership that referenced it.
pub async fn delete_tag(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
