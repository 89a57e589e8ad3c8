//! Credential redaction for log fields.

use serde_json::Value;

/// Replacement for redacted values.
pub const REDACTED: &str = "[REDACTED]";

const DENYLIST_KEYS: [&str; 10] = [
    "cookie",
    "cookies",
    "wr_skey",
    "skey",
    "token",
    "authorization",
    "secret",
    "pushplus_token",
    "telegram_bot_token",
    "serverchan_spt",
];

/// Whether a field name should never be written verbatim.
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    DENYLIST_KEYS.contains(&lower.as_str())
        || lower.ends_with("_token")
        || lower.ends_with("_cookie")
}

pub(crate) fn sanitize_value(key: &str, value: Value) -> Value {
    if is_sensitive_key(key) {
        return Value::String(REDACTED.to_string());
    }
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let v = sanitize_value(&k, v);
                    (k, v)
                })
                .collect(),
        ),
        other => other,
    }
}
