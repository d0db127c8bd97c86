use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::config::DispatchConfig;
use crate::notify::NotificationSink;

/// EmailJS REST endpoint used by the browser SDK under the hood
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Transactional-email collaborator identified by three opaque tokens
/// (service id, template id, public key). The payload carries exactly two
/// template parameters: the recipient display name and one pre-formatted
/// multi-line message.
pub struct EmailJsSink {
    client: reqwest::Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailJsSink {
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        Self::with_endpoint(config, EMAILJS_ENDPOINT.to_string())
    }

    pub fn with_endpoint(config: &DispatchConfig, endpoint: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build email dispatch HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
        })
    }
}

#[async_trait]
impl NotificationSink for EmailJsSink {
    async fn send(&self, to_name: &str, message: &str) -> Result<()> {
        let body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": {
                "to_name": to_name,
                "message": message,
            },
        });

        self.client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("email dispatch request failed")?
            .error_for_status()
            .context("email service rejected the notification")?;

        Ok(())
    }
}
