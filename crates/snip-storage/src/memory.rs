use async_trait::async_trait;
use parking_lot::RwLock;
use snip_core::error::Result;
use snip_core::{NewUrl, ShortCode, StorageType, Store, StoreError, StoreStats, UrlRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// In-memory implementation of the [`Store`] trait.
///
/// Records live in a `RwLock<HashMap>` keyed by short code: lookups share the
/// read lock, inserts take the write lock for a single map access. Ids come
/// from an [`AtomicU64`] that is independent of the lock, so id allocation
/// never waits on readers.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    urls: RwLock<HashMap<ShortCode, UrlRecord>>,
    counter: AtomicU64,
}

impl InMemoryStore {
    /// Creates an empty store whose first id will be `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            urls: RwLock::new(HashMap::with_capacity(capacity)),
            counter: AtomicU64::new(0),
        }
    }

    /// Atomically reserves the next id.
    ///
    /// Fails only once the 64-bit id space is exhausted; the counter never wraps.
    fn next_id(&self) -> Result<u64> {
        self.counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(|_| StoreError::IdGeneration("identifier space exhausted".to_string()))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn store(&self, request: NewUrl) -> Result<UrlRecord> {
        // The id is reserved before the record becomes visible. No other
        // caller can ever receive it, so the gap is harmless.
        let id = self.next_id()?;
        let record = UrlRecord::assign(id, request);

        self.urls
            .write()
            .insert(record.short_code.clone(), record.clone());

        debug!(id, code = %record.short_code, "stored URL record in memory");
        Ok(record)
    }

    async fn get(&self, code: &ShortCode) -> Result<UrlRecord> {
        let record = self.urls.read().get(code).cloned();

        let Some(record) = record else {
            trace!(code = %code, "short code not found");
            return Err(StoreError::NotFound(code.to_string()));
        };

        if self.is_expired(&record) {
            debug!(code = %code, "record has expired");
            return Err(StoreError::Expired(code.to_string()));
        }

        Ok(record)
    }

    async fn stats(&self) -> StoreStats {
        let total_urls = self.urls.read().len() as u64;
        let current_counter = self.counter.load(Ordering::SeqCst);
        StoreStats::new(StorageType::Memory, total_urls, current_counter)
    }
}
