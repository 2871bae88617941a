//! HTTP error responses.
//!
//! Every failure leaves the server as `{"message": ..., "error": ...}`.
//! `error` is `{}` by default. [`ApiError`] attaches an [`ErrorReport`] to
//! the response, and [`reveal_error_detail`], layered with the router's
//! development flag, rewrites the body to carry the underlying error text.

use axum::body::Body;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

/// Message and underlying error text of a failed request, carried in the
/// response extensions.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Anything unexpected. `detail` is only ever shown in development mode.
    Internal { detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_and_detail(self) -> (String, String) {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                (msg.clone(), msg)
            }
            ApiError::Internal { detail } => ("Internal Server Error".to_string(), detail),
        }
    }
}

impl From<noteful_core::Error> for ApiError {
    fn from(err: noteful_core::Error) -> Self {
        use noteful_core::Error;

        match err {
            Error::Validation(msg) | Error::InvalidReference(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            other => {
                error!(subsystem = "api", error = %other, "Unhandled store error");
                ApiError::Internal {
                    detail: other.to_string(),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(subsystem = "api", rejection = %rejection, "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Build the `{message, error}` body.
pub fn error_body(message: &str, detail: &str, expose: bool) -> serde_json::Value {
    let error = if expose {
        serde_json::Value::String(detail.to_string())
    } else {
        serde_json::json!({})
    };
    serde_json::json!({
        "message": message,
        "error": error,
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, detail) = self.message_and_detail();
        let body = error_body(&message, &detail, false);
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorReport { message, detail });
        response
    }
}

/// Response mapper: in development mode, replace an error body with one that
/// shows the underlying error text.
pub async fn reveal_error_detail(
    State(development): State<bool>,
    mut response: Response,
) -> Response {
    if !development {
        return response;
    }
    if let Some(report) = response.extensions_mut().remove::<ErrorReport>() {
        let body = error_body(&report.message, &report.detail, true);
        *response.body_mut() = Body::from(body.to_string());
        response.headers_mut().remove(header::CONTENT_LENGTH);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteful_core::Error;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(Error::missing_field("title"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let (message, _) = err.message_and_detail();
        assert_eq!(message, "Missing `title` in request body");
    }

    #[test]
    fn test_invalid_reference_maps_to_bad_request() {
        let err = ApiError::from(Error::InvalidReference("One or more tags do not exist".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::from(Error::Conflict("Folder name is already taken".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(Error::NotFound("Note 3 not found".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_error_is_internal_with_generic_message() {
        let err = ApiError::from(Error::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let (message, detail) = err.message_and_detail();
        assert_eq!(message, "Internal Server Error");
        assert!(detail.contains("Database error"), "{}", detail);
    }

    #[test]
    fn test_error_body_hides_detail_outside_development() {
        let body = error_body("Internal Server Error", "connection refused", false);
        assert_eq!(body["message"], "Internal Server Error");
        assert_eq!(body["error"], serde_json::json!({}));
    }

    #[test]
    fn test_response_carries_report_and_hides_detail() {
        let response = ApiError::Internal {
            detail: "connection refused".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.message, "Internal Server Error");
        assert_eq!(report.detail, "connection refused");
    }

    #[tokio::test]
    async fn test_reveal_error_detail_only_in_development() {
        let conflict = || ApiError::Conflict("Tag name is already taken".into()).into_response();

        let revealed = reveal_error_detail(State(true), conflict()).await;
        let bytes = axum::body::to_bytes(revealed.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Tag name is already taken");

        let hidden = reveal_error_detail(State(false), conflict()).await;
        let bytes = axum::body::to_bytes(hidden.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], serde_json::json!({}));
    }

    #[test]
    fn test_error_body_shows_detail_in_development() {
        let body = error_body("Internal Server Error", "connection refused", true);
        assert_eq!(body["error"], "connection refused");
    }
}
