//! Read response classification.

use serde_json::Value;

/// Success sentinel key.
const SUCCESS_KEY: &str = "succ";
/// Sync cursor key.
const CURSOR_KEY: &str = "synckey";

/// What a read response means for the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClassification {
    /// Accepted and the server issued a sync cursor.
    Succeeded,
    /// Accepted but without a cursor; the server needs a repair call.
    MissingCursor,
    /// No success sentinel; the session is treated as expired.
    SessionExpired,
}

/// Classify a decoded read response by key presence.
///
/// Values are not inspected: `{"succ":0}` still counts as accepted.
pub fn classify(body: &Value) -> ResponseClassification {
    let Some(object) = body.as_object() else {
        return ResponseClassification::SessionExpired;
    };

    match (
        object.contains_key(SUCCESS_KEY),
        object.contains_key(CURSOR_KEY),
    ) {
        (true, true) => ResponseClassification::Succeeded,
        (true, false) => ResponseClassification::MissingCursor,
        (false, _) => ResponseClassification::SessionExpired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_cursor() {
        assert_eq!(
            classify(&json!({"succ": 1, "synckey": 5})),
            ResponseClassification::Succeeded
        );
    }

    #[test]
    fn test_success_without_cursor() {
        assert_eq!(
            classify(&json!({"succ": 1})),
            ResponseClassification::MissingCursor
        );
    }

    #[test]
    fn test_missing_sentinel_is_expired() {
        assert_eq!(classify(&json!({})), ResponseClassification::SessionExpired);
        assert_eq!(
            classify(&json!({"errCode": -2012, "synckey": 3})),
            ResponseClassification::SessionExpired
        );
    }

    #[test]
    fn test_non_object_is_expired() {
        assert_eq!(
            classify(&json!(["succ", "synckey"])),
            ResponseClassification::SessionExpired
        );
        assert_eq!(classify(&Value::Null), ResponseClassification::SessionExpired);
    }

    #[test]
    fn test_presence_not_truthiness() {
        assert_eq!(
            classify(&json!({"succ": 0, "synckey": null})),
            ResponseClassification::Succeeded
        );
    }
}
