//! HTTP route handlers for the web interface.
//!
//! Routes are grouped by cache behavior. Picks are never cached; the home page
//! and catalog listing change only on restart; static assets are immutable.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;
pub mod songs;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HOME, CACHE_CONTROL_NO_STORE, CACHE_CONTROL_STATIC};
use crate::middleware::{identity_layer, request_id_layer};
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Home page and catalog listing - moderate cache
    let home_routes = Router::new()
        .route("/", get(home::index))
        .route("/api/songs", get(songs::list))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HOME),
        ));

    // Server function - every call may return a different song
    let pick_routes = Router::new()
        .route("/api/pick_random_song", post(songs::pick_random_song))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Static files - long cache with immutable hint
    let static_routes = Router::new()
        .nest_service("/static", ServeDir::new(&state.config.ui.static_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ));

    // Health checks - no caching, always fresh
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/store", get(health::store));

    Router::new()
        .merge(home_routes)
        .merge(pick_routes)
        .merge(health_routes)
        .merge(static_routes)
        .with_state(state.clone())
        // Authorization stub - attaches the fixed identity
        .layer(middleware::from_fn_with_state(state, identity_layer))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
