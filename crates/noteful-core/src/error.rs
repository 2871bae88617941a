//! Error types for noteful.

use thiserror::Error;

/// Result type alias using noteful's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for noteful operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required field is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Unique-name violation on folders or tags
    #[error("{0}")]
    Conflict(String),

    /// A referenced tag (or other entity) does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Validation error for a missing required body field.
    pub fn missing_field(field: &str) -> Self {
        Error::Validation(format!("Missing `{}` in request body", field))
    }
}
