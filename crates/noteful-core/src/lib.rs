//! # noteful-core
//!
//! Core types, traits, and abstractions for the noteful note store.
//!
//! This crate provides the domain models, the error taxonomy, the
//! repository traits the storage layer implements, and the pure step that
//! folds flat note × tag join rows into nested notes.
//!
//! ## Structured logging fields
//!
//! Every crate logs with the same field names so JSON output can be queried
//! uniformly:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | `"api"`, `"db"`, `"core"` |
//! | `component` | `"notes"`, `"folders"`, `"tags"`, `"pool"`, `"hydrate"` |
//! | `op` | `"list"`, `"fetch"`, `"insert"`, `"replace_tags"`, ... |
//! | `note_id` / `folder_id` / `tag_id` | Entity being operated on |
//! | `row_count` | Flat join rows read before folding |
//! | `result_count` | Items returned |
//! | `duration_ms` | Wall-clock duration |
//! | `sqlstate` | SQLSTATE of a classified database error |
//!
//! Levels: ERROR for store failures surfaced as 500, WARN for conflicts and
//! bad references, INFO for lifecycle, DEBUG for repository operations,
//! TRACE for per-row work.

pub mod error;
pub mod hydrate;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use hydrate::fold_note_rows;
pub use models::*;
pub use traits::*;
