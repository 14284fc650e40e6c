use crate::error::Result;
use crate::record::{NewUrl, UrlRecord};
use crate::shortcode::ShortCode;
use crate::stats::StoreStats;
use async_trait::async_trait;

/// Storage capability shared by every backend.
///
/// Implementations must be safe under arbitrary concurrent use: no two calls
/// to [`Store::store`] may ever be assigned the same id (and therefore the
/// same short code), and a [`Store::get`] issued after a successful
/// [`Store::store`] on the same instance must observe the new record.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Allocates an id for `request`, derives its short code and persists it.
    ///
    /// Returns the fully populated record; the short code to hand out is
    /// `record.short_code`.
    async fn store(&self, request: NewUrl) -> Result<UrlRecord>;

    /// Retrieves the record for `code`.
    ///
    /// Returns `Err(NotFound)` if the code was never stored and `Err(Expired)`
    /// if its expiration date has passed. Expired records are never returned.
    async fn get(&self, code: &ShortCode) -> Result<UrlRecord>;

    /// Returns whether `record` has expired.
    fn is_expired(&self, record: &UrlRecord) -> bool {
        record.is_expired()
    }

    /// Returns a best-effort statistics snapshot. Never fails.
    async fn stats(&self) -> StoreStats;
}
