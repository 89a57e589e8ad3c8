//! Parsing helpers for renewal responses and config flags.

/// Extract a cookie value from a raw (possibly comma-joined) `Set-Cookie`
/// header.
///
/// Segments are split on `,`; the first segment mentioning `name` whose
/// leading `key=value` part contains `=` wins. Empty values yield `None`.
pub fn token_from_set_cookie(header: &str, name: &str) -> Option<String> {
    for segment in header.split(',') {
        if !segment.contains(name) {
            continue;
        }
        let pair = segment.split(';').next().unwrap_or_default();
        if let Some((_, value)) = pair.split_once('=') {
            let value = value.trim();
            return (!value.is_empty()).then(|| value.to_string());
        }
    }
    None
}

/// Parse a loose boolean: `1`, `true`, `t`, `yes` (any case) are true.
pub fn parse_bool_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_single_cookie() {
        let header = "wr_skey=AbCdEf123; Path=/; Domain=.weread.qq.com; HttpOnly";
        assert_eq!(
            token_from_set_cookie(header, "wr_skey"),
            Some("AbCdEf123".to_string())
        );
    }

    #[test]
    fn test_token_from_joined_cookies() {
        let header = "wr_vid=42; Path=/, wr_skey= XyZ987 ; Path=/, wr_rt=abc";
        assert_eq!(
            token_from_set_cookie(header, "wr_skey"),
            Some("XyZ987".to_string())
        );
    }

    #[test]
    fn test_token_missing() {
        assert_eq!(token_from_set_cookie("wr_vid=42; Path=/", "wr_skey"), None);
        assert_eq!(token_from_set_cookie("", "wr_skey"), None);
    }

    #[test]
    fn test_token_empty_value_is_none() {
        assert_eq!(token_from_set_cookie("wr_skey=; Path=/", "wr_skey"), None);
    }

    #[test]
    fn test_segment_without_equals_is_skipped() {
        let header = "note wr_skey, wr_skey=second";
        assert_eq!(
            token_from_set_cookie(header, "wr_skey"),
            Some("second".to_string())
        );
    }

    #[test]
    fn test_parse_bool_flag() {
        for truthy in ["1", "true", "TRUE", " t ", "Yes"] {
            assert!(parse_bool_flag(truthy), "{truthy} should be true");
        }
        for falsy in ["0", "false", "", "no", "on"] {
            assert!(!parse_bool_flag(falsy), "{falsy} should be false");
        }
    }
}
