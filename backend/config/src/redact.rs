//! Config redaction: produce safe-to-log config snapshots by masking credentials.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &["botToken", "bot_token", "token", "secret", "password"];

/// Discord bot token shape: `<base64 user id>.<timestamp>.<hmac>`.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]{20,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{20,}").unwrap());

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Mask a credential, keeping a 4-character hint.
pub fn mask(secret: &str) -> String {
    if secret.chars().count() > 4 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Redact a config JSON value, masking secret fields and token-shaped strings.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if s.is_empty() => Value::String(String::new()),
        Value::String(s) if is_secret_key(key) => Value::String(mask(s)),
        Value::String(s) => Value::String(
            TOKEN_PATTERN
                .replace_all(s, |caps: &regex::Captures| mask(&caps[0]))
                .into_owned(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
