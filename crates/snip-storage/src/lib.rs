//! Storage backends for the snip URL shortener.
//!
//! Two interchangeable [`Store`](snip_core::Store) implementations:
//!
//! - [`InMemoryStore`]: process-local and volatile, for single-instance use.
//! - [`RedisStore`]: shared through Redis, safe across many instances.

pub mod memory;
pub mod redis;

pub use crate::memory::InMemoryStore;
pub use crate::redis::{RedisStore, COUNTER_KEY, URL_KEY_PREFIX};
pub use snip_core::{NewUrl, ShortCode, StorageType, Store, StoreError, StoreStats, UrlRecord};
