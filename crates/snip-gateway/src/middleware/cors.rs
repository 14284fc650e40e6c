use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS: any origin and header, the usual REST methods.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
