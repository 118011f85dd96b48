use crate::config::PushoverConfig;
use crate::domain::ports::NotificationChannel;
use crate::infrastructure::core::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

/// Pushover rejects messages longer than this many characters
pub const PUSHOVER_MAX_MESSAGE_CHARS: usize = 1024;

pub struct PushoverChannel {
    client: Client,
    config: PushoverConfig,
}

impl PushoverChannel {
    pub fn new(config: PushoverConfig) -> Self {
        Self {
            client: HttpClientFactory::create_plain_client(),
            config,
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl NotificationChannel for PushoverChannel {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn send(&self, title: &str, body: &str) -> Result<()> {
        let message = truncate_chars(body, PUSHOVER_MAX_MESSAGE_CHARS);
        let form = [
            ("token", self.config.token.as_str()),
            ("user", self.config.user.as_str()),
            ("title", title),
            ("message", message.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&form)
            .send()
            .await
            .context("Failed to send Pushover request")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Pushover returned status {}: {}", status, text);
        }

        info!("Pushover notification sent: {}", title);
        Ok(())
    }
}
