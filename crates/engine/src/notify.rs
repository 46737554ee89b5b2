//! Tier change notifications
//!
//! Best-effort webhook delivery; failures are logged and never bubble into
//! the classification path.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::tier_state::TierChange;

/// Posts tier changes to a configured webhook
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Notify on upgrades and downgrades; unchanged and overridden results
    /// are silent
    pub async fn tier_changed(&self, organization_id: Uuid, change: &TierChange) {
        let Some(url) = &self.webhook_url else {
            return;
        };

        let (from, to) = match change {
            TierChange::Upgraded { from, to } | TierChange::Downgraded { from, to } => (from, to),
            _ => return,
        };

        let payload = serde_json::json!({
            "organization_id": organization_id,
            "from": from,
            "to": to,
            "direction": change.status(),
        });

        match self.client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(
                    "Tier change notification sent for organization {}",
                    organization_id
                );
            }
            Ok(response) => {
                warn!(
                    "Tier change notification for {} returned {}",
                    organization_id,
                    response.status()
                );
            }
            Err(e) => {
                warn!(
                    "Tier change notification for {} failed: {}",
                    organization_id, e
                );
            }
        }
    }
}
