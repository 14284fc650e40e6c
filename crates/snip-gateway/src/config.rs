use std::num::NonZeroU32;
use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: NonZeroU32 = NonZeroU32::new(20).unwrap();

/// Knobs for the HTTP middleware stack.
#[derive(Debug, Clone, TypedBuilder)]
pub struct GatewayConfig {
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    /// Requests allowed per client IP per minute, refilled continuously.
    #[builder(default = DEFAULT_RATE_LIMIT_PER_MINUTE)]
    pub rate_limit_per_minute: NonZeroU32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Parses a human-friendly duration such as `10s`, `500ms` or `2m`.
///
/// A bare integer is read as seconds. Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let signed: jiff::SignedDuration = input
        .parse()
        .map_err(|e| format!("invalid duration '{input}': {e}"))?;
    Duration::try_from(signed).map_err(|_| format!("duration must not be negative: '{input}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.rate_limit_per_minute.get(), 20);
    }

    #[test]
    fn parses_friendly_durations() {
        assert_eq!(parse_duration("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h 30m"), Ok(Duration::from_secs(5400)));
    }

    #[test]
    fn bare_integer_is_seconds() {
        assert_eq!(parse_duration("30"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration(" 5 "), Ok(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_garbage_and_negative() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-5s").is_err());
    }
}
