//! Outbound notifications (mail relay).
//!
//! The record service only knows the [`Notifier`] contract; delivery is up
//! to the implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::NotificationConfig;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid notifier configuration: {0}")]
    Config(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes messages to the log instead of delivering them.
///
/// # Examples
/// ```
/// use service::notify::{LogNotifier, Notifier};
/// let n = LogNotifier;
/// tokio_test::block_on(n.send("ana@school.test", "New Grade", "Hi Ana")).unwrap();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(%recipient, %subject, %body, "notification");
        Ok(())
    }
}

#[derive(Serialize)]
struct MailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Posts `{to, subject, body}` as JSON to a mail relay.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Config(e.to_string()))?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip(self, body), fields(url = %self.url))]
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&MailRequest { to: recipient, subject, body })
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(NotifyError::Delivery(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}

/// Pick the notifier described by configuration: the relay when a URL is set, the log otherwise.
pub fn from_config(cfg: &NotificationConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &cfg.webhook_url {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(url.clone(), Duration::from_secs(cfg.timeout_secs))?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}

/// Recording notifier for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentMessage {
        pub recipient: String,
        pub subject: String,
        pub body: String,
    }

    /// Keeps every message it was asked to send; optionally slow, optionally failing.
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<SentMessage>>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        /// Wait `delay` before each delivery attempt is recorded.
        pub fn delayed(self, delay: Duration) -> Self {
            Self { delay: Some(delay), ..self }
        }

        pub fn sent(&self) -> Vec<SentMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.sent.lock().unwrap().push(SentMessage {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            if self.fail {
                return Err(NotifyError::Delivery("relay unavailable".into()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_notifier_without_webhook() {
        let cfg = NotificationConfig::default();
        assert!(from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn unreachable_relay_is_delivery_error() {
        let n = WebhookNotifier::new("http://127.0.0.1:9/send", Duration::from_millis(500)).unwrap();
        let err = n.send("a@b.c", "s", "b").await.unwrap_err();
        assert!(matches!(err, NotifyError::Delivery(_)));
    }

    #[tokio::test]
    async fn recording_notifier_keeps_failed_attempts() {
        let n = mock::RecordingNotifier::failing();
        assert!(n.send("a@b.c", "s", "b").await.is_err());
        assert_eq!(n.sent().len(), 1);
    }
}
