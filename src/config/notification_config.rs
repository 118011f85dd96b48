//! Notification channel configuration parsing from environment variables.
//!
//! A channel is enabled only when all of its settings are present.

use std::env;

pub const DEFAULT_PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Debug, Clone, PartialEq)]
pub struct PushoverConfig {
    pub token: String,
    pub user: String,
    pub api_url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationEnvConfig {
    pub pushover: Option<PushoverConfig>,
    pub webhook_url: Option<String>,
}

impl NotificationEnvConfig {
    pub fn from_env() -> Self {
        let pushover = match (non_empty("PUSHOVER_TOKEN"), non_empty("PUSHOVER_USER")) {
            (Some(token), Some(user)) => Some(PushoverConfig {
                token,
                user,
                api_url: non_empty("PUSHOVER_API_URL")
                    .unwrap_or_else(|| DEFAULT_PUSHOVER_API_URL.to_string()),
            }),
            _ => None,
        };

        Self {
            pushover,
            webhook_url: non_empty("NOTIFY_WEBHOOK_URL"),
        }
    }

    pub fn has_channels(&self) -> bool {
        self.pushover.is_some() || self.webhook_url.is_some()
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
