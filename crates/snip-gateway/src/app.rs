use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::timeout::TimeoutLayer;

use crate::config::GatewayConfig;
use crate::handlers::{create_url_handler, health_handler, redirect_handler, url_stats_handler};
use crate::middleware::content_type::require_json;
use crate::middleware::rate_limit::{rate_limit, IpRateLimit};
use crate::middleware::{cors, trace};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the full router: routes wrapped (outermost first) in tracing,
    /// request timeout, CORS, content-type checking and per-IP rate limiting.
    pub fn router(state: AppState, config: &GatewayConfig) -> Router {
        let limit = IpRateLimit::per_minute(config.rate_limit_per_minute);

        Router::new()
            .route("/health", get(health_handler))
            .route("/urls", post(create_url_handler))
            .route("/urls/{short_code}/stats", get(url_stats_handler))
            .route("/{short_code}", get(redirect_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(limit, rate_limit))
            .layer(middleware::from_fn(require_json))
            .layer(cors::layer())
            .layer(TimeoutLayer::new(config.request_timeout))
            .layer(trace::layer())
    }
}
