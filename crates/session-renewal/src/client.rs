//! HTTP client construction shared by renewal and read submission.

use crate::error::{RenewalError, RenewalResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::Client;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Build a client that sends the captured browser headers on every request.
///
/// A `Cookie` header in the capture is dropped; cookies always come from the
/// live `SessionStore`.
pub fn build_http_client(
    headers: &BTreeMap<String, String>,
    timeout: Duration,
) -> RenewalResult<Client> {
    let mut default_headers = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| RenewalError::InvalidHeader(name.clone()))?;
        if header_name == COOKIE {
            continue;
        }
        let header_value = HeaderValue::from_str(value.trim())
            .map_err(|_| RenewalError::InvalidHeader(name.clone()))?;
        default_headers.insert(header_name, header_value);
    }

    Ok(Client::builder()
        .default_headers(default_headers)
        .timeout(timeout)
        .build()?)
}

/// Short, log-safe fingerprint of a response body.
pub fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}
