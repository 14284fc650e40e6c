//! Core types and traits for the snip URL shortener.
//!
//! This crate holds everything the storage backends and the HTTP gateway
//! share: the base62 codec, the [`ShortCode`] identifier, the [`UrlRecord`]
//! model and the [`Store`] capability trait.

pub mod base62;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod stats;
pub mod store;

pub use error::{DecodeError, StoreError};
pub use record::{NewUrl, UrlRecord};
pub use shortcode::ShortCode;
pub use stats::{StorageType, StoreStats};
pub use store::Store;
