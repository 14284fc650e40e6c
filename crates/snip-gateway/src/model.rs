use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::{ShortCode, StoreStats, UrlRecord};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub long_url: String,
    #[serde(default)]
    pub expiration_date: Option<Timestamp>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    pub short_url: String,
}

/// Everything known about a short code. `expiration_date` is `null` when the
/// link never expires.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlStatsResponse {
    pub id: u64,
    pub short_code: ShortCode,
    pub long_url: String,
    pub created_at: Timestamp,
    pub expiration_date: Option<Timestamp>,
}

impl From<UrlRecord> for UrlStatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            id: record.id,
            short_code: record.short_code,
            long_url: record.long_url,
            created_at: record.created_at,
            expiration_date: record.expiration_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub stats: StoreStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
