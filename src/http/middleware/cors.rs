//! Cross-origin headers for every response.
//!
//! Any origin may read any response, including errors. `OPTIONS`
//! preflights are answered here and never reach a handler.

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Methods advertised in preflight responses.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(Any)
}
