//! Session key renewal against the login renewal endpoint.

use crate::client::summarize_response_body;
use crate::cookie::{parse_bool_flag, token_from_set_cookie};
use crate::error::{RenewalError, RenewalResult};
use crate::store::{SessionStore, RENEWAL_MODE_COOKIE, SESSION_KEY_COOKIE};
use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Renewal endpoint of the web reader.
pub const DEFAULT_RENEW_URL: &str = "https://weread.qq.com/web/login/renewal";

/// Route the renewed session is requested for.
pub const DEFAULT_READ_ROUTE: &str = "/web/book/read";

/// Upper bound on a single renewal request.
pub const RENEWAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything able to renew the session key in place.
///
/// Returns true only when a new non-empty key was stored. Failures are
/// reported, never raised; the caller decides whether they are fatal.
#[async_trait]
pub trait SessionRenewer: Send + Sync {
    async fn refresh(&self, session: &mut SessionStore) -> bool;
}

/// Renewal settings.
#[derive(Debug, Clone)]
pub struct RenewalConfig {
    /// Renewal endpoint URL.
    pub renew_url: String,
    /// Route sent (percent-encoded) as `rq`.
    pub route: String,
    /// Environment override for the `ql` flag. When unset the session's
    /// `wr_ql` cookie decides.
    pub ql_override: Option<bool>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RenewalConfig {
    fn default() -> Self {
        Self {
            renew_url: DEFAULT_RENEW_URL.to_string(),
            route: DEFAULT_READ_ROUTE.to_string(),
            ql_override: None,
            timeout: RENEWAL_TIMEOUT,
        }
    }
}

/// Body of the renewal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewalRequest {
    pub rq: String,
    pub ql: bool,
}

/// Renews `wr_skey` through the web renewal endpoint.
pub struct SessionRefresher {
    http_client: Client,
    config: RenewalConfig,
}

impl SessionRefresher {
    pub fn new(http_client: Client, config: RenewalConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Build the renewal body for the current session.
    pub fn renewal_request(&self, session: &SessionStore) -> RenewalRequest {
        let ql = self.config.ql_override.unwrap_or_else(|| {
            session
                .cookie(RENEWAL_MODE_COOKIE)
                .map(parse_bool_flag)
                .unwrap_or(false)
        });

        RenewalRequest {
            rq: urlencoding::encode(&self.config.route).into_owned(),
            ql,
        }
    }

    /// Single renewal attempt. Returns the new key without storing it.
    async fn try_refresh(&self, session: &SessionStore) -> RenewalResult<String> {
        let body = self.renewal_request(session);
        debug!(rq = %body.rq, ql = body.ql, "Renewal payload");

        let response = self
            .http_client
            .post(&self.config.renew_url)
            .header(COOKIE, session.cookie_header())
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        let from_jar = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_KEY_COOKIE)
            .map(|cookie| cookie.value().trim().to_string())
            .filter(|value| !value.is_empty());

        let token = match from_jar {
            Some(token) => Some(token),
            None => {
                let raw = response
                    .headers()
                    .get_all(SET_COOKIE)
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .collect::<Vec<_>>()
                    .join(",");
                token_from_set_cookie(&raw, SESSION_KEY_COOKIE)
            }
        };

        match token {
            Some(token) => Ok(token),
            None => {
                let body = response.text().await.unwrap_or_default();
                Err(RenewalError::TokenNotFound {
                    status: status.as_u16(),
                    body_summary: summarize_response_body(&body),
                })
            }
        }
    }
}

#[async_trait]
impl SessionRenewer for SessionRefresher {
    async fn refresh(&self, session: &mut SessionStore) -> bool {
        info!("Refreshing session cookie");

        let token = match self.try_refresh(session).await {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, transient = e.is_transient(), "Session refresh failed");
                return false;
            }
        };

        if let Err(e) = session.replace_skey(token) {
            error!(error = %e, "Session refresh failed");
            return false;
        }

        info!(skey_prefix = %session.masked_skey(), "Session refreshed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn session(ql: Option<&str>) -> SessionStore {
        let mut cookies = BTreeMap::new();
        cookies.insert("wr_vid".to_string(), "12345".to_string());
        cookies.insert("wr_skey".to_string(), "expired0".to_string());
        if let Some(ql) = ql {
            cookies.insert("wr_ql".to_string(), ql.to_string());
        }
        SessionStore::new(cookies)
    }

    fn refresher(renew_url: String, ql_override: Option<bool>) -> SessionRefresher {
        SessionRefresher::new(
            Client::new(),
            RenewalConfig {
                renew_url,
                ql_override,
                timeout: Duration::from_secs(2),
                ..Default::default()
            },
        )
    }

    /// Serve a single canned HTTP response and hand back the raw request.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/web/login/renewal", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    #[test]
    fn test_renewal_request_defaults_to_cookie_flag() {
        let refresher = refresher(DEFAULT_RENEW_URL.to_string(), None);
        assert_eq!(
            refresher.renewal_request(&session(Some("1"))),
            RenewalRequest {
                rq: "%2Fweb%2Fbook%2Fread".to_string(),
                ql: true
            }
        );
        assert!(!refresher.renewal_request(&session(None)).ql);
    }

    #[test]
    fn test_renewal_request_env_override_wins() {
        let refresher = refresher(DEFAULT_RENEW_URL.to_string(), Some(false));
        assert!(!refresher.renewal_request(&session(Some("true"))).ql);
    }

    #[test]
    fn test_renewal_request_serializes_compactly() {
        let body = RenewalRequest {
            rq: "%2Fweb%2Fbook%2Fread".to_string(),
            ql: false,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"rq":"%2Fweb%2Fbook%2Fread","ql":false}"#
        );
    }

    #[tokio::test]
    async fn test_refresh_stores_token_from_cookie() {
        let token = "0123456789abcdef0123456789abcdef01234567";
        let response = "HTTP/1.1 200 OK\r\n\
             Set-Cookie: wr_skey=0123456789abcdef0123456789abcdef01234567; Path=/; HttpOnly\r\n\
             Content-Type: application/json\r\n\
             Content-Length: 2\r\n\
             Connection: close\r\n\r\n{}";
        let (url, server) = serve_once(response).await;

        let mut session = session(None);
        assert!(refresher(url, None).refresh(&mut session).await);
        assert_eq!(session.skey(), Some(token));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /web/login/renewal"));
        assert!(request.contains("wr_skey=expired0; wr_vid=12345"));
        assert!(request.contains(r#""rq":"%2Fweb%2Fbook%2Fread""#));
    }

    #[tokio::test]
    async fn test_refresh_without_token_leaves_session_untouched() {
        let response = "HTTP/1.1 200 OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: 18\r\n\
             Connection: close\r\n\r\n{\"errCode\":-2012}\n";
        let (url, server) = serve_once(response).await;

        let mut session = session(None);
        let before = session.clone();
        assert!(!refresher(url, None).refresh(&mut session).await);
        assert_eq!(session, before);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_network_failure_returns_false() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/renewal", listener.local_addr().unwrap());
        drop(listener);

        let mut session = session(None);
        assert!(!refresher(url, None).refresh(&mut session).await);
        assert_eq!(session.skey(), Some("expired0"));
    }
}
