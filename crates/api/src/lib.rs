//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The chatbot routes (`/summarize`, `/save_user_data`, `/upload_cv`)
//! - Health checks
//! - JSON error responses

pub mod error;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use zeno_core::estimate::EstimateEngine;
use zeno_core::lead::ResilientStore;
use zeno_core::storage::StorageService;
use zeno_shared::{CollectionsConfig, SalesMailer, ServerConfig};

pub use error::ApiError;

/// Room left for multipart framing and the `state_json` field on top of the
/// file size limit.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Estimate engine.
    pub engine: Arc<EstimateEngine>,
    /// Document store with fallback.
    pub store: Arc<ResilientStore>,
    /// Sales team notifications.
    pub mailer: Arc<SalesMailer>,
    /// CV storage.
    pub storage: Arc<StorageService>,
    /// Collection names.
    pub collections: Arc<CollectionsConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let body_limit = state
        .storage
        .config()
        .max_file_size
        .saturating_add(MULTIPART_OVERHEAD);

    let mut router = routes::api_routes();

    router = match &server.static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static frontend");
            router.fallback_service(
                ServeDir::new(dir).not_found_service(routes::not_found.into_service()),
            )
        }
        None => router.fallback(routes::not_found),
    };

    let mut router = router
        .layer(DefaultBodyLimit::max(usize::try_from(body_limit).unwrap_or(usize::MAX)))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(cors) = cors_layer(server) {
        router = router.layer(cors);
    }

    router
}

fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    let origins = server.cors_origin_list()?;

    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    )
}
