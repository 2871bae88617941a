//! HTTP handlers for noteful's REST resources.

pub mod folders;
pub mod health;
pub mod notes;
pub mod tags;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ApiError;

/// Body of `POST`/`PUT` on folders and tags.
#[derive(Debug, Deserialize)]
pub struct NameBody {
    pub name: Option<String>,
}

/// Reject a missing or blank body field with the standard validation message.
pub fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(noteful_core::Error::missing_field(field).into()),
    }
}

/// Parse an optional id query parameter. Empty means "no filter".
pub fn parse_id_param(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ApiError::BadRequest(format!("Invalid `{}` query parameter: {}", name, value))
        }),
    }
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

/// Browser forms send ids as strings, with `""` for "none".
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    fn into_id<E: serde::de::Error>(self) -> Result<Option<i64>, E> {
        match self {
            LooseId::Number(id) => Ok(Some(id)),
            LooseId::Text(text) if text.trim().is_empty() => Ok(None),
            LooseId::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid id: {}", text))),
        }
    }
}

/// Deserialize an optional id given as a number, numeric string, `""` or `null`.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(id) => id.into_id(),
    }
}

/// Deserialize a list of ids, tolerating numeric strings and a `null` list.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<LooseId>>::deserialize(deserializer)?.unwrap_or_default();
    let mut ids = Vec::with_capacity(raw.len());
    for id in raw {
        if let Some(id) = id.into_id()? {
            ids.push(id);
        }
    }
    Ok(ids)
}
