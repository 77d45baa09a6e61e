//! HTTP server for tubeshelf.
//!
//! Serves the browser front end from a static directory and a small JSON
//! API over the video client and the watch history.

#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

pub mod api_error;
mod blocking;
mod handlers;
mod query_types;

#[cfg(test)]
mod router_tests;

use axum::http::{HeaderValue, header};
use axum::{Router, routing::get};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

use tubeshelf_api::VideoClient;
use tubeshelf_storage::HistoryStore;

use crate::api_error::ApiError;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Video platform client; shares one key pool across requests
    pub client: Arc<VideoClient>,
    /// Watch history, accessed on the blocking pool
    pub history: Arc<Mutex<HistoryStore>>,
    /// Region used when `/api/trending` gets none
    pub default_region: String,
}

impl AppState {
    #[must_use]
    pub fn new(client: VideoClient, history: HistoryStore, default_region: String) -> Self {
        Self {
            client: Arc::new(client),
            history: Arc::new(Mutex::new(history)),
            default_region,
        }
    }
}

/// Builds the router. Unknown `/api` paths get a JSON 404; every other path
/// outside `/api` and `/health` is served from `static_dir`, falling back to
/// its `index.html`.
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let index = static_dir.join("index.html");
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let api = Router::new()
        .route("/trending", get(handlers::videos::trending))
        .route("/search", get(handlers::videos::search))
        .route("/videos/{id}/statistics", get(handlers::videos::statistics))
        .route("/channels/{id}", get(handlers::videos::channel))
        .route(
            "/history",
            get(handlers::history::list_history)
                .post(handlers::history::record_watch)
                .delete(handlers::history::clear_history),
        )
        .fallback(api_not_found);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("unknown API endpoint".to_owned())
}
