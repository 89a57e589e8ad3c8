//! Canonical `key=value&...` encoding used as signature input.

use crate::payload::RequestPayload;

/// Percent-encode a value with an empty safe set.
///
/// Only RFC 3986 unreserved characters stay literal, space becomes `%20`
/// and every other UTF-8 byte becomes an uppercase `%XX` escape.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Encode a payload as sorted `key=value` pairs joined by `&`.
///
/// The remote service rebuilds this exact string to verify the signature,
/// so key order and escaping must not drift.
pub fn encode_payload(payload: &RequestPayload) -> String {
    payload
        .iter()
        .map(|(key, value)| format!("{}={}", key, percent_encode(&value.to_string())))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PayloadValue;

    #[test]
    fn test_percent_encode_has_no_safe_characters() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a/b"), "a%2Fb");
        assert_eq!(percent_encode("a+b=c&d"), "a%2Bb%3Dc%26d");
        assert_eq!(percent_encode("~_.-"), "~_.-");
    }

    #[test]
    fn test_percent_encode_utf8_uppercase() {
        assert_eq!(
            encode_payload(&[("x", "三体 a+b~_.-")].into_iter().collect()),
            "x=%E4%B8%89%E4%BD%93%20a%2Bb~_.-"
        );
    }

    #[test]
    fn test_encoding_ignores_insertion_order() {
        let forward: RequestPayload = [
            ("b", PayloadValue::from("book")),
            ("c", PayloadValue::from("chapter")),
            ("ct", PayloadValue::Int(1744264311)),
            ("appId", PayloadValue::from("wb1")),
        ]
        .into_iter()
        .collect();

        let mut reversed = RequestPayload::new();
        reversed.set("appId", "wb1");
        reversed.set("ct", 1744264311i64);
        reversed.set("c", "chapter");
        reversed.set("b", "book");

        assert_eq!(encode_payload(&forward), encode_payload(&reversed));
        assert_eq!(
            encode_payload(&forward),
            "appId=wb1&b=book&c=chapter&ct=1744264311"
        );
    }

    #[test]
    fn test_empty_payload_encodes_to_empty_string() {
        assert_eq!(encode_payload(&RequestPayload::new()), "");
    }
}
