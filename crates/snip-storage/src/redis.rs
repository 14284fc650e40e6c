use async_trait::async_trait;
use parking_lot::RwLock;
use redis::aio::{ConnectionLike, MultiplexedConnection};
use redis::{AsyncCommands, RedisError};
use snip_core::error::Result;
use snip_core::{NewUrl, ShortCode, StorageType, Store, StoreError, StoreStats, UrlRecord};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace, warn};

/// Key holding the shared id counter, as a plain integer string.
pub const COUNTER_KEY: &str = "counter";

/// Prefix of the keys holding JSON-serialized URL records.
pub const URL_KEY_PREFIX: &str = "url:";

/// Keys requested per SCAN round trip when counting records.
const SCAN_BATCH: usize = 1000;

fn url_key(code: &ShortCode) -> String {
    format!("{URL_KEY_PREFIX}{}", code.as_str())
}

fn map_redis_error(operation: &str, err: RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_io_error() || err.is_timeout() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Backend(message)
    }
}

/// A Redis-backed implementation of [`Store`], shareable across instances.
///
/// Ids come from `INCR counter`, which Redis executes atomically for every
/// connected client; that single command is what keeps codes unique across
/// processes. Each record is then written as JSON under `url:<code>` with no
/// TTL, and expiration is checked when the record is read.
///
/// Allocating the id and writing the record are two separate round trips.
/// A failure in between burns the id but never produces a duplicate.
///
/// The store is generic over the connection so callers decide how Redis is
/// reached (timeouts, pooling, a fake in tests). [`RedisStore::connect`]
/// covers the common case of a multiplexed connection from a URL.
pub struct RedisStore<C = MultiplexedConnection> {
    conn: RwLock<Option<C>>,
    // Last id seen by this instance, for stats only. Uniqueness comes from INCR.
    counter: AtomicU64,
}

impl RedisStore<MultiplexedConnection> {
    /// Connects to the Redis server at `redis_url` (e.g. `redis://localhost:6379/0`).
    ///
    /// Fails if the URL is malformed or the server does not answer a PING.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        info!(redis_url, "connecting to Redis");

        let client = redis::Client::open(redis_url)
            .map_err(|e| StoreError::Unavailable(format!("failed to parse Redis URL: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to Redis: {e}")))?;

        Self::with_connection(conn).await
    }
}

impl<C> RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    /// Wraps an established connection.
    ///
    /// Verifies connectivity with a PING and seeds the stats counter from the
    /// current value of [`COUNTER_KEY`] (zero if absent).
    pub async fn with_connection(mut conn: C) -> Result<Self> {
        let () = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to Redis: {e}")))?;

        let counter: Option<u64> = conn
            .get(COUNTER_KEY)
            .await
            .map_err(|e| map_redis_error("failed to initialize counter", e))?;
        let counter = counter.unwrap_or(0);

        info!(counter, "connected to Redis");

        Ok(Self {
            conn: RwLock::new(Some(conn)),
            counter: AtomicU64::new(counter),
        })
    }

    /// Closes the connection. Every later `store` or `get` fails with
    /// [`StoreError::Closed`].
    pub fn close(&self) {
        if self.conn.write().take().is_some() {
            info!("closed Redis connection");
        }
    }

    /// Returns `true` once [`RedisStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.conn.read().is_none()
    }

    fn connection(&self) -> Result<C> {
        self.conn.read().clone().ok_or(StoreError::Closed)
    }

    async fn count_urls(conn: &mut C) -> redis::RedisResult<u64> {
        let pattern = format!("{URL_KEY_PREFIX}*");
        // SCAN may report a key more than once, so collect before counting.
        let mut keys = HashSet::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await?;
            keys.extend(batch);

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys.len() as u64)
    }
}

#[async_trait]
impl<C> Store for RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn store(&self, request: NewUrl) -> Result<UrlRecord> {
        let mut conn = self.connection()?;

        let id: u64 = conn
            .incr(COUNTER_KEY, 1u64)
            .await
            .map_err(|e| StoreError::IdGeneration(e.to_string()))?;
        let record = UrlRecord::assign(id, request);

        let json = serde_json::to_string(&record).map_err(|e| {
            StoreError::InvalidData(format!("failed to serialize URL record: {e}"))
        })?;

        let key = url_key(&record.short_code);
        conn.set::<_, _, ()>(&key, json)
            .await
            .map_err(|e| map_redis_error("failed to store URL record in Redis", e))?;

        self.counter.fetch_max(id, Ordering::SeqCst);

        debug!(id, code = %record.short_code, "stored URL record in Redis");
        Ok(record)
    }

    async fn get(&self, code: &ShortCode) -> Result<UrlRecord> {
        let mut conn = self.connection()?;
        let key = url_key(code);
        trace!(code = %code, "fetching URL record from Redis");

        let data: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| map_redis_error("failed to get URL record from Redis", e))?;

        let Some(data) = data else {
            trace!(code = %code, "short code not found");
            return Err(StoreError::NotFound(code.to_string()));
        };

        let record: UrlRecord = serde_json::from_str(&data).map_err(|e| {
            warn!(code = %code, error = %e, "failed to deserialize URL record");
            StoreError::InvalidData(format!("invalid value for key '{key}': {e}"))
        })?;

        if self.is_expired(&record) {
            debug!(code = %code, "record has expired");
            return Err(StoreError::Expired(code.to_string()));
        }

        Ok(record)
    }

    async fn stats(&self) -> StoreStats {
        let current_counter = self.counter.load(Ordering::SeqCst);

        let Ok(mut conn) = self.connection() else {
            return StoreStats::degraded(StorageType::Redis, current_counter);
        };

        match Self::count_urls(&mut conn).await {
            Ok(total_urls) => StoreStats::new(StorageType::Redis, total_urls, current_counter),
            Err(e) => {
                warn!(error = %e, "failed to count URL records, reporting zero");
                StoreStats::degraded(StorageType::Redis, current_counter)
            }
        }
    }
}

impl<C> std::fmt::Debug for RedisStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("closed", &self.conn.read().is_none())
            .field("counter", &self.counter.load(Ordering::SeqCst))
            .finish()
    }
}
