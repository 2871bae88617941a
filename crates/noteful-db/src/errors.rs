//! Translation of PostgreSQL constraint violations into domain errors.

use tracing::warn;

use noteful_core::Error;

/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error to the domain taxonomy.
///
/// Unique violations on folder/tag names become `Conflict`, foreign key
/// violations become `InvalidReference`; everything else stays `Database`.
pub fn classify(err: sqlx::Error) -> Error {
    let (code, constraint) = match err.as_database_error() {
        Some(db_err) => (
            db_err.code().map(|c| c.into_owned()),
            db_err.constraint().map(str::to_owned),
        ),
        None => return Error::Database(err),
    };

    match (code.as_deref(), constraint.as_deref()) {
        (Some(UNIQUE_VIOLATION), Some("folders_name_key")) => {
            warn!(subsystem = "db", sqlstate = UNIQUE_VIOLATION, "Duplicate folder name");
            Error::Conflict("Folder name is already taken".to_string())
        }
        (Some(UNIQUE_VIOLATION), Some("tags_name_key")) => {
            warn!(subsystem = "db", sqlstate = UNIQUE_VIOLATION, "Duplicate tag name");
            Error::Conflict("Tag name is already taken".to_string())
        }
        (Some(FOREIGN_KEY_VIOLATION), constraint) => {
            let constraint = constraint.unwrap_or("unknown");
            warn!(
                subsystem = "db",
                sqlstate = FOREIGN_KEY_VIOLATION,
                constraint,
                "Reference to missing row"
            );
            Error::InvalidReference(reference_message(constraint))
        }
        _ => Error::Database(err),
    }
}

fn reference_message(constraint: &str) -> String {
    if constraint.contains("tag_id") {
        "One or more tags do not exist".to_string()
    } else if constraint.contains("note_id") {
        "Note does not exist".to_string()
    } else {
        format!("Referenced row does not exist ({})", constraint)
    }
}
