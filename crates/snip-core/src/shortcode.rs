use crate::base62::{self, MAX_ENCODED_LEN};
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The base62 short code identifying one URL record.
///
/// A code is a pure function of the record id: [`ShortCode::from_id`] and
/// [`ShortCode::decode`] are inverse operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Encodes a record id as a short code.
    pub fn from_id(id: u64) -> Self {
        Self(base62::encode(id))
    }

    /// Creates a `ShortCode` from untrusted input after validating its shape.
    ///
    /// Valid codes are 1-11 characters from the base62 alphabet. The value is
    /// not decoded here, so a well-formed code that overflows `u64` is still
    /// accepted and simply never matches a stored record.
    pub fn new(code: impl Into<String>) -> Result<Self, DecodeError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from a trusted store.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Decodes the code back into the record id it was derived from.
    pub fn decode(&self) -> Result<u64, DecodeError> {
        base62::decode(&self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    fn validate(code: &str) -> Result<(), DecodeError> {
        if code.is_empty() {
            return Err(DecodeError::Empty);
        }

        if let Some((position, character)) = code
            .chars()
            .enumerate()
            .find(|(_, c)| !base62::is_base62_char(*c))
        {
            return Err(DecodeError::InvalidCharacter {
                character,
                position,
            });
        }

        if code.len() > MAX_ENCODED_LEN {
            return Err(DecodeError::TooLong {
                len: code.len(),
                max: MAX_ENCODED_LEN,
            });
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
