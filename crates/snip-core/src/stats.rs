use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The kind of backend a store persists to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Memory,
    Redis,
}

impl Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Memory => f.write_str("memory"),
            StorageType::Redis => f.write_str("redis"),
        }
    }
}

/// A best-effort snapshot of store statistics.
///
/// `current_counter` is the last identifier handed out (or observed) by the
/// store. `total_urls` counts stored records, expired ones included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_urls: u64,
    pub current_counter: u64,
    pub storage_type: StorageType,
    /// Set when the backend could not be queried and `total_urls` fell back to zero.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl StoreStats {
    pub fn new(storage_type: StorageType, total_urls: u64, current_counter: u64) -> Self {
        Self {
            total_urls,
            current_counter,
            storage_type,
            degraded: false,
        }
    }

    /// Stats for a backend that could not be reached: only the locally known
    /// counter survives.
    pub fn degraded(storage_type: StorageType, current_counter: u64) -> Self {
        Self {
            total_urls: 0,
            current_counter,
            storage_type,
            degraded: true,
        }
    }
}
