use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Input for creating a new shortened URL.
///
/// The URL is expected to be validated by the caller; stores persist it as-is.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct NewUrl {
    /// The original URL to be shortened.
    #[builder(setter(into))]
    pub long_url: String,
    /// When the shortened URL stops resolving, if ever.
    #[builder(default, setter(strip_option))]
    pub expiration_date: Option<Timestamp>,
}

impl NewUrl {
    /// Creates a request for a URL that never expires.
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            expiration_date: None,
        }
    }

    /// Sets the expiration timestamp.
    pub fn expires_at(mut self, expiration_date: Timestamp) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }
}

/// A stored URL record.
///
/// The serialized form is the persisted layout of the shared store:
/// `id`, `short_code`, `long_url`, `created_at` and an optional
/// `expiration_date`, timestamps as RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: u64,
    pub short_code: ShortCode,
    pub long_url: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
}

impl UrlRecord {
    /// Builds the record for a freshly allocated id.
    ///
    /// The short code is derived from `id`, and `created_at` is set to now.
    pub fn assign(id: u64, request: NewUrl) -> Self {
        Self {
            id,
            short_code: ShortCode::from_id(id),
            long_url: request.long_url,
            created_at: Timestamp::now(),
            expiration_date: request.expiration_date,
        }
    }

    /// Returns whether the record is expired at `now`.
    ///
    /// A record without an expiration date never expires. A record whose
    /// expiration date equals `now` is still live.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiration_date
            .is_some_and(|expiration_date| now > expiration_date)
    }

    /// Returns whether the record is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }
}
