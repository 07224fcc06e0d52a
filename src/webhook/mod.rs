//! Webhook delivery transport
//!
//! [`ReleaseTransport`] is the single seam between the pure assembly logic
//! and the network: one operation, deliver a payload plus its uploads, one
//! success-or-typed-failure outcome, no retries. [`DiscordWebhook`] is the
//! real implementation; tests stand in their own.

mod error;

pub use error::WebhookError;

use async_trait::async_trait;

use crate::config::WebhookConfig;
use crate::discord::components::{AttachmentUpload, WebhookPayload};

const DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Delivers one assembled document to the configured destination.
#[async_trait]
pub trait ReleaseTransport: Send + Sync {
    async fn deliver(
        &self,
        payload: &WebhookPayload,
        files: &[AttachmentUpload],
    ) -> Result<(), WebhookError>;
}

/// Discord webhook-execute client.
pub struct DiscordWebhook {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl DiscordWebhook {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn execute_url(&self) -> String {
        format!(
            "{}/webhooks/{}/{}",
            DISCORD_API_URL, self.config.id, self.config.token
        )
    }
}

#[async_trait]
impl ReleaseTransport for DiscordWebhook {
    async fn deliver(
        &self,
        payload: &WebhookPayload,
        files: &[AttachmentUpload],
    ) -> Result<(), WebhookError> {
        let payload_json =
            serde_json::to_string(payload).map_err(|e| WebhookError::Other(e.into()))?;

        let mut form = reqwest::multipart::Form::new().text("payload_json", payload_json);
        for (index, file) in files.iter().enumerate() {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    WebhookError::BadRequest(format!(
                        "invalid content type {:?}: {}",
                        file.content_type, e
                    ))
                })?;
            form = form.part(format!("files[{index}]"), part);
        }

        let mut request = self
            .client
            .post(self.execute_url())
            .query(&[("wait", "true"), ("with_components", "true")]);
        if let Some(thread_id) = &self.config.thread_id {
            request = request.query(&[("thread_id", thread_id.as_str())]);
        }

        let response = request
            .multipart(form)
            .send()
            .await
            .map_err(WebhookError::from_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::from_http_status(status, body));
        }

        tracing::debug!("webhook accepted message with {} attachment(s)", files.len());
        Ok(())
    }
}
