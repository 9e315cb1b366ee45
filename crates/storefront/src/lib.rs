//! Devico Storefront library.
//!
//! Server-rendered storefront built on `devico-core`. Exposed as a library so
//! the binary and the integration tests build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// Routes are mounted under the configured base path; unknown paths render
/// the home page.
pub fn app(state: AppState) -> Router {
    let base = state.base().clone();
    let session_layer =
        middleware::create_session_layer(state.config(), state.sessions().clone());
    let static_files = ServeDir::new(&state.config().static_dir);

    let site = routes::routes().nest_service("/static", static_files);
    let router = if base.is_root() {
        Router::new().merge(site)
    } else {
        Router::new().nest(base.as_str(), site)
    };

    router
        .route("/health", get(routes::health))
        .fallback(routes::home::index)
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
