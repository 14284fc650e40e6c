//! Test fixtures shared by the snip crates.

mod error;
pub mod redis;

pub use error::{Result, TestInfraError};
