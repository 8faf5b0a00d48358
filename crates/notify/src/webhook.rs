use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook client initialization failed: {0}")]
    Build(#[source] reqwest::Error),
    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("webhook endpoint answered status {0}")]
    Status(u16),
}

/// Transport seam for outcome notifications. One rendered report in,
/// delivered or failed; the caller decides what a failure means.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), WebhookError>;
}

/// Posts `{ "text": .. }` to one fixed incoming-webhook URL. The URL is
/// a credential (anyone holding it can post to the channel) and is kept
/// behind `SecretString`.
pub struct HttpWebhookSender {
    http: reqwest::Client,
    url: SecretString,
}

impl HttpWebhookSender {
    pub fn new(url: SecretString, timeout_secs: u64) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(WebhookError::Build)?;

        Ok(Self { http, url })
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn send(&self, text: &str) -> Result<(), WebhookError> {
        let response = self
            .http
            .post(self.url.expose_secret())
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(WebhookError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }

        debug!(bytes = text.len(), "outcome notification delivered");
        Ok(())
    }
}

/// Swallows every report. Used when notifications are disabled and as
/// the default transport in tests.
#[derive(Default)]
pub struct NoopWebhookSender;

#[async_trait]
impl WebhookSender for NoopWebhookSender {
    async fn send(&self, _text: &str) -> Result<(), WebhookError> {
        Ok(())
    }
}
