use crate::domain::history::HistoryRecord;
use crate::domain::ports::NotificationChannel;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Notification title for a run, e.g. `CrashGuard: ORANGE (CRI 58.25)`
pub fn notification_title(record: &HistoryRecord) -> String {
    format!("CrashGuard: {} (CRI {})", record.state, record.cri)
}

pub fn notification_body(record: &HistoryRecord) -> Result<String> {
    serde_json::to_string_pretty(record).context("Failed to serialize notification body")
}

/// Delivers a message through the first channel that accepts it.
///
/// Failures are logged and swallowed; callers only learn whether delivery succeeded.
pub struct NotificationService {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationService {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    pub fn has_channels(&self) -> bool {
        !self.channels.is_empty()
    }

    pub async fn notify(&self, title: &str, body: &str) -> bool {
        if !self.has_channels() {
            warn!("No notification channel configured, dropping '{}'", title);
            return false;
        }

        for channel in &self.channels {
            match channel.send(title, body).await {
                Ok(()) => {
                    info!("Notification delivered via {}", channel.name());
                    return true;
                }
                Err(e) => warn!("Notification via {} failed: {:#}", channel.name(), e),
            }
        }

        warn!("All {} notification channels failed", self.channels.len());
        false
    }

    /// Notify about a run record; false when nothing was delivered
    pub async fn notify_record(&self, record: &HistoryRecord) -> bool {
        let body = match notification_body(record) {
            Ok(body) => body,
            Err(e) => {
                warn!("{:#}", e);
                return false;
            }
        };
        self.notify(&notification_title(record), &body).await
    }
}
