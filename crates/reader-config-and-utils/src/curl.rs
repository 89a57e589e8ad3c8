//! Header and cookie extraction from a browser-captured `curl` command.
//!
//! Accepts the "Copy as cURL (bash)" form: `-H 'name: value'` header
//! flags and an optional `-b '...'` / `--cookie '...'` flag. Without a
//! cookie flag the `Cookie:` header is used instead.

use crate::{CoreError, CoreResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const COOKIE_HEADER: &str = "cookie";

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:-H|--header)\s+(?:'([^']*)'|"([^"]*)")"#).expect("valid header regex")
    })
}

fn cookie_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:-b|--cookie)\s+(?:'([^']*)'|"([^"]*)")"#).expect("valid cookie regex")
    })
}

/// What a curl command carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurlCapture {
    /// Request headers, excluding `Cookie`.
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
}

/// Parse `name=value; name2=value2`.
pub fn parse_cookie_header(raw: &str) -> BTreeMap<String, String> {
    raw.split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

fn quoted<'a>(captures: &regex::Captures<'a>) -> Option<&'a str> {
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
}

/// Extract headers and cookies. A command without any cookie is rejected.
pub fn parse_curl_command(command: &str) -> CoreResult<CurlCapture> {
    let mut capture = CurlCapture::default();
    let mut cookie_header = None;

    for captures in header_regex().captures_iter(command) {
        let Some((name, value)) = quoted(&captures).and_then(|h| h.split_once(':')) else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case(COOKIE_HEADER) {
            cookie_header = Some(value.to_string());
        } else if !name.is_empty() {
            capture.headers.insert(name.to_string(), value.to_string());
        }
    }

    let cookie_source = cookie_regex()
        .captures(command)
        .and_then(|c| quoted(&c).map(str::to_string))
        .or(cookie_header);

    if let Some(raw) = cookie_source {
        capture.cookies = parse_cookie_header(&raw);
    }

    if capture.cookies.is_empty() {
        return Err(CoreError::Config(
            "curl command carries no cookies (expected -b or a Cookie header)".to_string(),
        ));
    }

    Ok(capture)
}
