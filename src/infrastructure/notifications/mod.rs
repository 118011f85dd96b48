pub mod pushover;
pub mod webhook;

pub use pushover::PushoverChannel;
pub use webhook::WebhookChannel;

use crate::config::NotificationEnvConfig;
use crate::domain::ports::NotificationChannel;
use std::sync::Arc;

/// Configured channels in delivery order: Pushover first, then the webhook
pub fn channels_from_config(config: &NotificationEnvConfig) -> Vec<Arc<dyn NotificationChannel>> {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();
    if let Some(pushover) = &config.pushover {
        channels.push(Arc::new(PushoverChannel::new(pushover.clone())));
    }
    if let Some(url) = &config.webhook_url {
        channels.push(Arc::new(WebhookChannel::new(url.clone())));
    }
    channels
}
