//! Log Redaction Layer
//!
//! Scrubs bot tokens and bearer credentials from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BOT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_-]{20,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{20,}").unwrap()
});
static AUTH_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Bot|Bearer)\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Authorization headers first, so the scheme name goes with the credential
    let redacted = AUTH_HEADER_RE.replace_all(input, "[REDACTED_TOKEN]");
    BOT_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "GET /gateway with Bot MTA0NjQ0NzE5NjEyMzQ1Njc4OQ.GxYz12.abcdefghijklmnopqrstuvwxyz0123";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("MTA0NjQ0"));
        assert_eq!(clean, "GET /gateway with [REDACTED_TOKEN]");
    }

    #[test]
    fn bare_token_is_redacted() {
        let raw = "token=MTA0NjQ0NzE5NjEyMzQ1Njc4OQ.GxYz12.abcdefghijklmnopqrstuvwxyz0123 end";
        assert_eq!(redact_sensitive_data(raw), "token=[REDACTED_TOKEN] end");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(redact_sensitive_data("/hello from 1234"), "/hello from 1234");
    }
}
