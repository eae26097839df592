//! Webhook notifications - formatting plus fire-and-forget delivery
//!
//! The sink is a chat webhook receiving block-formatted messages. A missing
//! webhook URL turns delivery into a logged no-op. Delivery is never
//! retried and never rolled back against committed store state.

pub mod format;

use std::time::Duration;

use tracing::{debug, info};

use crate::config::NotifyConfig;
use crate::models::{DailyEntry, LockWeekRequest};
use crate::teams::team_label;

/// Placeholder value shipped in sample configs; treated as unconfigured
const PLACEHOLDER_URL: &str = "https://hooks.slack.com/services/YOUR/WEBHOOK/URL";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
}

pub struct Notifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(config: &NotifyConfig) -> Self {
        let webhook_url = config
            .webhook_url
            .clone()
            .filter(|url| !url.is_empty() && url != PLACEHOLDER_URL);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            webhook_url,
            client,
        }
    }

    /// Send a daily lock notification for `entry`
    pub async fn send_daily(&self, entry: &DailyEntry) -> Result<(), NotifyError> {
        let Some(url) = &self.webhook_url else {
            debug!("Webhook not configured, skipping daily notification");
            return Ok(());
        };

        let payload = format::daily_message(entry);
        self.client
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        info!(
            team = %team_label(&entry.team),
            date = %entry.date,
            "Daily notification sent"
        );
        Ok(())
    }

    /// Send a week-summary notification
    pub async fn send_weekly(&self, week: &LockWeekRequest) -> Result<(), NotifyError> {
        let Some(url) = &self.webhook_url else {
            debug!("Webhook not configured, skipping weekly notification");
            return Ok(());
        };

        let payload = format::weekly_message(week);
        self.client
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        info!(
            team = %team_label(&week.team),
            week_start = %week.week_start,
            "Weekly notification sent"
        );
        Ok(())
    }
}
