//! Read submission and sync-cursor repair over HTTP.

use crate::error::{ReaderError, ReaderResult};
use async_trait::async_trait;
use read_signature::RequestPayload;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::Client;
use serde_json::{json, Value};
use session_renewal::SessionStore;
use tracing::{debug, warn};

/// Read submission endpoint.
pub const DEFAULT_READ_URL: &str = "https://weread.qq.com/web/book/read";

/// Sync-cursor repair endpoint.
pub const DEFAULT_FIX_SYNCKEY_URL: &str = "https://weread.qq.com/web/book/chapterInfos";

/// The remote calls the read loop depends on.
#[async_trait]
pub trait ReadApi: Send + Sync {
    /// Submit one signed payload and return the decoded response body.
    async fn submit_read(
        &self,
        session: &SessionStore,
        payload: &RequestPayload,
    ) -> ReaderResult<Value>;

    /// Best-effort repair of a missing sync cursor. Failures are swallowed.
    async fn repair_sync_cursor(&self, session: &SessionStore);
}

/// Endpoint URLs for the web reader.
#[derive(Debug, Clone)]
pub struct ReadEndpoints {
    pub read_url: String,
    pub fix_synckey_url: String,
}

impl Default for ReadEndpoints {
    fn default() -> Self {
        Self {
            read_url: DEFAULT_READ_URL.to_string(),
            fix_synckey_url: DEFAULT_FIX_SYNCKEY_URL.to_string(),
        }
    }
}

/// `ReadApi` backed by reqwest.
pub struct WebReadApi {
    http_client: Client,
    endpoints: ReadEndpoints,
    repair_book_ids: Vec<String>,
}

impl WebReadApi {
    /// `http_client` should already carry the captured browser headers and a
    /// request timeout.
    pub fn new(http_client: Client, endpoints: ReadEndpoints, repair_book_ids: Vec<String>) -> Self {
        Self {
            http_client,
            endpoints,
            repair_book_ids,
        }
    }

    fn repair_body(&self) -> String {
        json!({ "bookIds": self.repair_book_ids }).to_string()
    }
}

#[async_trait]
impl ReadApi for WebReadApi {
    async fn submit_read(
        &self,
        session: &SessionStore,
        payload: &RequestPayload,
    ) -> ReaderResult<Value> {
        let body = payload.to_json()?;

        let response = self
            .http_client
            .post(&self.endpoints.read_url)
            .header(COOKIE, session.cookie_header())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ReaderError::Submission(e.to_string()))?;

        let status = response.status();
        let decoded = response
            .json::<Value>()
            .await
            .map_err(|e| ReaderError::Submission(format!("HTTP {}: {}", status, e)))?;

        debug!(status = %status, response = %decoded, "Read response");
        Ok(decoded)
    }

    async fn repair_sync_cursor(&self, session: &SessionStore) {
        let result = self
            .http_client
            .post(&self.endpoints.fix_synckey_url)
            .header(COOKIE, session.cookie_header())
            .header(CONTENT_TYPE, "application/json")
            .body(self.repair_body())
            .send()
            .await;

        match result {
            Ok(response) => debug!(status = %response.status(), "Sync cursor repair sent"),
            Err(e) => warn!(error = %e, "Sync cursor repair failed"),
        }
    }
}
