//! Layers wrapped around every route.

pub mod content_type;
pub mod cors;
pub mod rate_limit;
pub mod trace;
