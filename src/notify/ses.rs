//! Amazon SES (v2 API) email notifier.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::sigv4::{Credentials, Signer};
use super::{Notification, Notifier, NotifyError};

const SERVICE: &str = "ses";
const SEND_EMAIL_PATH: &str = "/v2/email/outbound-emails";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CHARSET: &str = "UTF-8";

/// Sends each notification as a plain-text email through SES.
pub struct SesNotifier {
    client: Client,
    url: Url,
    region: String,
    credentials: Credentials,
}

impl SesNotifier {
    /// Build a notifier with credentials from the environment.
    pub fn from_env(region: &str, endpoint: Option<&str>) -> Result<Self, NotifyError> {
        Self::new(region, endpoint, Credentials::from_env()?)
    }

    /// `endpoint` overrides `https://email.<region>.amazonaws.com`.
    pub fn new(
        region: &str,
        endpoint: Option<&str>,
        credentials: Credentials,
    ) -> Result<Self, NotifyError> {
        let base = match endpoint {
            Some(e) => e.to_string(),
            None => format!("https://email.{}.amazonaws.com", region),
        };
        let invalid = |reason: String| NotifyError::InvalidEndpoint {
            endpoint: base.clone(),
            reason,
        };
        let url = Url::parse(&base)
            .and_then(|u| u.join(SEND_EMAIL_PATH))
            .map_err(|e| invalid(e.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid("no host".to_string()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("notifybot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url,
            region: region.to_string(),
            credentials,
        })
    }

    fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

/// SendEmail request body for a simple text message.
fn request_body(notification: &Notification) -> Value {
    json!({
        "FromEmailAddress": notification.from,
        "Destination": {
            "ToAddresses": [notification.to],
        },
        "Content": {
            "Simple": {
                "Subject": { "Data": notification.subject, "Charset": CHARSET },
                "Body": {
                    "Text": { "Data": notification.body, "Charset": CHARSET },
                },
            },
        },
    })
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = request_body(notification).to_string().into_bytes();

        let signer = Signer {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
        };
        let headers = signer.sign(
            "POST",
            &self.host(),
            self.url.path(),
            vec![("content-type".to_string(), "application/json".to_string())],
            &payload,
            Utc::now(),
        );

        let mut request = self.client.post(self.url.clone()).body(payload);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let message_id = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("MessageId").and_then(Value::as_str).map(str::to_string));
        debug!(?message_id, "SES accepted message");
        info!(recipient = %notification.to, "Email sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ses"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn notification() -> Notification {
        Notification {
            subject: "IRC Notification Event".into(),
            body: "[2024-05-01 12:04:05] alice is online".into(),
            from: "bot@example.com".into(),
            to: "me@example.com".into(),
        }
    }

    /// Accept one HTTP request, answer with `status` and return the raw request.
    async fn serve_once(listener: TcpListener, status: &'static str, body: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    async fn notifier_for(listener: &TcpListener) -> SesNotifier {
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        SesNotifier::new(
            "us-east-1",
            Some(&endpoint),
            Credentials::new("AKIDTEST", "secret", None),
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body(&notification());
        assert_eq!(body["FromEmailAddress"], "bot@example.com");
        assert_eq!(body["Destination"]["ToAddresses"][0], "me@example.com");
        assert_eq!(
            body["Content"]["Simple"]["Subject"]["Data"],
            "IRC Notification Event"
        );
        assert_eq!(
            body["Content"]["Simple"]["Body"]["Text"]["Data"],
            "[2024-05-01 12:04:05] alice is online"
        );
    }

    #[test]
    fn test_default_endpoint_uses_region() {
        let notifier =
            SesNotifier::new("eu-west-1", None, Credentials::new("a", "b", None)).unwrap();
        assert_eq!(
            notifier.url.as_str(),
            "https://email.eu-west-1.amazonaws.com/v2/email/outbound-emails"
        );
        assert_eq!(notifier.host(), "email.eu-west-1.amazonaws.com");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = SesNotifier::new("us-east-1", Some("not a url"), Credentials::new("a", "b", None));
        assert!(matches!(result, Err(NotifyError::InvalidEndpoint { .. })));
    }

    #[tokio::test]
    async fn test_send_signs_and_posts() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let notifier = notifier_for(&listener).await;
        let server = tokio::spawn(serve_once(listener, "200 OK", r#"{"MessageId":"m-1"}"#));

        notifier.send(&notification()).await.unwrap();

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /v2/email/outbound-emails HTTP/1.1"));
        assert!(lower.contains("authorization: aws4-hmac-sha256 credential=akidtest/"));
        assert!(lower.contains("x-amz-date:"));
        assert!(request.contains("\"FromEmailAddress\":\"bot@example.com\""));
        assert!(request.contains("alice is online"));
    }

    #[tokio::test]
    async fn test_error_status_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let notifier = notifier_for(&listener).await;
        let server = tokio::spawn(serve_once(
            listener,
            "400 Bad Request",
            r#"{"message":"Email address is not verified."}"#,
        ));

        let err = notifier.send(&notification()).await.unwrap_err();
        server.await.unwrap();

        match err {
            NotifyError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("not verified"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
