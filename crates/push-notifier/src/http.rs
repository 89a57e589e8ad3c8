//! HTTP delivery to the supported push services.

use crate::error::{NotifyError, NotifyResult};
use crate::method::PushMethod;
use crate::{Notifier, PUSH_TITLE};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tokens for each push service, usually read from the environment.
#[derive(Debug, Clone, Default)]
pub struct PushCredentials {
    pub pushplus_token: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub serverchan_spt: Option<String>,
    pub webhook_url: Option<String>,
}

impl PushCredentials {
    /// Read credentials from `PUSHPLUS_TOKEN`, `TELEGRAM_BOT_TOKEN`,
    /// `TELEGRAM_CHAT_ID`, `SERVERCHAN_SPT` and `WEBHOOK_URL`.
    pub fn from_env() -> Self {
        Self {
            pushplus_token: non_empty_env("PUSHPLUS_TOKEN"),
            telegram_bot_token: non_empty_env("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: non_empty_env("TELEGRAM_CHAT_ID"),
            serverchan_spt: non_empty_env("SERVERCHAN_SPT"),
            webhook_url: non_empty_env("WEBHOOK_URL"),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Upper bound on a single push request.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(15);

/// Base URLs of the push services.
#[derive(Debug, Clone)]
pub struct PushEndpoints {
    pub pushplus: String,
    pub telegram: String,
    pub serverchan: String,
}

impl Default for PushEndpoints {
    fn default() -> Self {
        Self {
            pushplus: "https://www.pushplus.plus/send".to_string(),
            telegram: "https://api.telegram.org".to_string(),
            serverchan: "https://sctapi.ftqq.com".to_string(),
        }
    }
}

/// Notifier that posts to PushPlus, Telegram, ServerChan or a webhook.
pub struct HttpPushNotifier {
    http_client: Client,
    credentials: PushCredentials,
    endpoints: PushEndpoints,
}

impl HttpPushNotifier {
    pub fn new(credentials: PushCredentials) -> NotifyResult<Self> {
        Self::with_endpoints(credentials, PushEndpoints::default())
    }

    pub fn with_endpoints(
        credentials: PushCredentials,
        endpoints: PushEndpoints,
    ) -> NotifyResult<Self> {
        let http_client = Client::builder()
            .timeout(PUSH_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::ClientSetup(e.to_string()))?;
        Ok(Self {
            http_client,
            credentials,
            endpoints,
        })
    }

    /// Resolve the target URL and JSON body for a method.
    fn request_for(
        &self,
        message: &str,
        method: &PushMethod,
    ) -> NotifyResult<(String, serde_json::Value)> {
        match method {
            PushMethod::PushPlus => {
                let token = self
                    .credentials
                    .pushplus_token
                    .as_deref()
                    .ok_or(NotifyError::MissingCredential("PUSHPLUS_TOKEN"))?;
                Ok((
                    self.endpoints.pushplus.clone(),
                    json!({ "token": token, "title": PUSH_TITLE, "content": message }),
                ))
            }
            PushMethod::Telegram => {
                let bot_token = self
                    .credentials
                    .telegram_bot_token
                    .as_deref()
                    .ok_or(NotifyError::MissingCredential("TELEGRAM_BOT_TOKEN"))?;
                let chat_id = self
                    .credentials
                    .telegram_chat_id
                    .as_deref()
                    .ok_or(NotifyError::MissingCredential("TELEGRAM_CHAT_ID"))?;
                Ok((
                    format!("{}/bot{}/sendMessage", self.endpoints.telegram, bot_token),
                    json!({ "chat_id": chat_id, "text": message }),
                ))
            }
            PushMethod::ServerChan => {
                let spt = self
                    .credentials
                    .serverchan_spt
                    .as_deref()
                    .ok_or(NotifyError::MissingCredential("SERVERCHAN_SPT"))?;
                Ok((
                    format!("{}/{}.send", self.endpoints.serverchan, spt),
                    json!({ "title": PUSH_TITLE, "desp": message }),
                ))
            }
            PushMethod::Webhook => {
                let url = self
                    .credentials
                    .webhook_url
                    .as_deref()
                    .ok_or(NotifyError::MissingCredential("WEBHOOK_URL"))?;
                Ok((
                    url.to_string(),
                    json!({ "title": PUSH_TITLE, "content": message }),
                ))
            }
        }
    }
}

#[async_trait]
impl Notifier for HttpPushNotifier {
    async fn notify(&self, message: &str, method: Option<&PushMethod>) -> NotifyResult<()> {
        let Some(method) = method else {
            warn!("No push method configured, notification not sent");
            return Err(NotifyError::NoMethod);
        };
        let (url, body) = self.request_for(message, method)?;
        debug!(method = %method, "Sending push notification");

        let response = self.http_client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(method = %method, status = %status, "Push service rejected notification");
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        info!(method = %method, "Push notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_missing_credential() {
        let notifier = HttpPushNotifier::new(PushCredentials::default()).unwrap();
        assert!(matches!(
            notifier.request_for("hi", &PushMethod::PushPlus),
            Err(NotifyError::MissingCredential("PUSHPLUS_TOKEN"))
        ));
        assert!(matches!(
            notifier.request_for("hi", &PushMethod::Telegram),
            Err(NotifyError::MissingCredential("TELEGRAM_BOT_TOKEN"))
        ));
    }

    #[test]
    fn test_telegram_request_shape() {
        let notifier = HttpPushNotifier::new(PushCredentials {
            telegram_bot_token: Some("123:abc".to_string()),
            telegram_chat_id: Some("42".to_string()),
            ..Default::default()
        })
        .unwrap();
        let (url, body) = notifier
            .request_for("done", &PushMethod::Telegram)
            .unwrap();
        assert_eq!(url, "https://api.telegram.org/bot123:abc/sendMessage");
        assert_eq!(body, json!({ "chat_id": "42", "text": "done" }));
    }

    #[test]
    fn test_serverchan_request_shape() {
        let notifier = HttpPushNotifier::new(PushCredentials {
            serverchan_spt: Some("SCT1".to_string()),
            ..Default::default()
        })
        .unwrap();
        let (url, body) = notifier
            .request_for("done", &PushMethod::ServerChan)
            .unwrap();
        assert_eq!(url, "https://sctapi.ftqq.com/SCT1.send");
        assert_eq!(body["desp"], "done");
    }

    #[tokio::test]
    async fn test_webhook_rejection_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the request (headers plus a JSON body ending in `}`).
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !(request.windows(4).any(|w| w == b"\r\n\r\n") && request.ends_with(b"}")) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
            socket.shutdown().await.ok();
        });

        let notifier = HttpPushNotifier::new(PushCredentials {
            webhook_url: Some(url),
            ..Default::default()
        })
        .unwrap();
        let result = notifier.notify("fatal", Some(&PushMethod::Webhook)).await;
        assert!(matches!(result, Err(NotifyError::Rejected(500))));
        server.await.unwrap();
    }

    #[test]
    fn test_with_endpoints_returns_configured_client() {
        let notifier = HttpPushNotifier::with_endpoints(
            PushCredentials {
                pushplus_token: Some("tok".to_string()),
                ..Default::default()
            },
            PushEndpoints {
                pushplus: "http://127.0.0.1:9/send".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        let (url, body) = notifier.request_for("done", &PushMethod::PushPlus).unwrap();
        assert_eq!(url, "http://127.0.0.1:9/send");
        assert_eq!(body["token"], "tok");
    }

    #[tokio::test]
    async fn test_missing_method_is_an_error() {
        let notifier = HttpPushNotifier::new(PushCredentials {
            webhook_url: Some("http://127.0.0.1:9/hook".to_string()),
            ..Default::default()
        })
        .unwrap();
        let result = notifier.notify("fatal", None).await;
        assert!(matches!(result, Err(NotifyError::NoMethod)));
    }
}
