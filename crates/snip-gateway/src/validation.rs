use url::Url;

/// Returns whether `input` is an absolute `http` or `https` URL with a host.
pub fn is_valid_url(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_url("https://www.example.com"));
        assert!(is_valid_url("http://google.com/search?q=test"));
        assert!(is_valid_url("https://example.com:8443/a/b#frag"));
        assert!(is_valid_url("HTTP://EXAMPLE.COM"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn rejects_malformed() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("   "));
        assert!(!is_valid_url("invalid-url"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("/relative/path"));
    }
}
