use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by [`Store`](crate::Store) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("URL has expired: {0}")]
    Expired(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to generate ID: {0}")]
    IdGeneration(String),
    #[error("storage operation failed: {0}")]
    Backend(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage connection is closed")]
    Closed,
}

impl StoreError {
    /// Returns `true` when the lookup failed because the record does not exist
    /// or is no longer retrievable.
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Expired(_))
    }
}

/// Errors produced when decoding a base62 string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("base62 input is empty")]
    Empty,
    #[error("invalid base62 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("base62 value does not fit in 64 bits")]
    Overflow,
    #[error("short code is too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },
}
