//! Base62 codec for record identifiers.
//!
//! The alphabet is `[0-9][a-z][A-Z]`, in that order. The ordering fixes the
//! shape of every generated code (`1` -> `"1"`, `62` -> `"10"`), so it must
//! never change once codes have been handed out.

use crate::error::DecodeError;

/// The base62 alphabet: digits, then lowercase, then uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = 62;

/// Length of the encoding of `u64::MAX`, the longest possible code.
pub const MAX_ENCODED_LEN: usize = 11;

/// Encodes `n` as a base62 string, most significant digit first.
///
/// `0` encodes to `"0"`; no other value gets leading zeros.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut buf = [0u8; MAX_ENCODED_LEN];
    let mut pos = MAX_ENCODED_LEN;
    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    // The alphabet is pure ASCII.
    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 string produced by [`encode`].
///
/// Fails with [`DecodeError::Empty`] for `""`, [`DecodeError::InvalidCharacter`]
/// for anything outside the alphabet and [`DecodeError::Overflow`] once the
/// value exceeds `u64::MAX`.
pub fn decode(s: &str) -> Result<u64, DecodeError> {
    if s.is_empty() {
        return Err(DecodeError::Empty);
    }

    s.chars().enumerate().try_fold(0u64, |acc, (position, character)| {
        let digit = digit_value(character)
            .ok_or(DecodeError::InvalidCharacter { character, position })?;
        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(DecodeError::Overflow)
    })
}

/// Returns `true` if `c` belongs to the base62 alphabet.
pub fn is_base62_char(c: char) -> bool {
    digit_value(c).is_some()
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u64 - '0' as u64,
        'a'..='z' => c as u64 - 'a' as u64 + 10,
        'A'..='Z' => c as u64 - 'A' as u64 + 36,
        _ => return None,
    };
    Some(value)
}
