//! # noteful-api
//!
//! REST server for noteful: notes with folders and tags, mounted under
//! `/api/v1`, plus a static front-end served from `PUBLIC_DIR`.
//!
//! The router is built by [`app`] so the binary and the in-process router
//! tests share one middleware stack.

pub mod config;
pub mod error;
pub mod handlers;

use std::any::Any;
use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, warn};
use uuid::Uuid;

use noteful_db::Database;

pub use config::ServerConfig;
pub use error::ApiError;

use handlers::{folders, health, notes, tags};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// UUIDv7 request IDs: time-ordered, so they sort with the logs they tag.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Origins allowed when `ALLOWED_ORIGINS` is unset or blank.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:8080", "http://localhost:3000"];

/// Parse a comma-separated origin list, skipping entries that are not valid
/// header values.
pub fn parse_allowed_origins(raw: Option<&str>) -> Vec<HeaderValue> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return DEFAULT_ALLOWED_ORIGINS
            .iter()
            .copied()
            .map(HeaderValue::from_static)
            .collect();
    }

    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Catch-all for paths that match neither a route nor a static file.
async fn not_found() -> Response {
    ApiError::NotFound("Not Found".to_string()).into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(subsystem = "api", panic = %detail, "Handler panicked");
    ApiError::Internal { detail }.into_response()
}

/// Build the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    let cors = cors_layer(parse_allowed_origins(
        state.config.allowed_origins.as_deref(),
    ));

    Router::new()
        .route("/health", get(health::health_check))
        // Notes
        .route(
            "/api/v1/notes",
            get(notes::list_notes).post(notes::create_note),
        )
        .route(
            "/api/v1/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        // Folders
        .route(
            "/api/v1/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route(
            "/api/v1/folders/:id",
            get(folders::get_folder)
                .put(folders::update_folder)
                .delete(folders::delete_folder),
        )
        // Tags
        .route("/api/v1/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/v1/tags/:id",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        // Static front-end; anything else is a JSON 404
        .fallback_service(static_files)
        // Middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::map_response_with_state(
            state.config.development,
            error::reveal_error_detail,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .with_state(state)
}
