//! HTTP front end for the snip URL shortener.
//!
//! Exposes URL creation, redirects, per-code stats and a health check over
//! any [`Store`](snip_core::Store) backend.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod state;
pub mod validation;

pub use app::App;
pub use config::GatewayConfig;
pub use state::AppState;
