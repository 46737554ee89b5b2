//! Application state

use common::Config;
use engine::Notifier;
use sqlx::PgPool;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let notifier = Notifier::new(config.tier_webhook_url.clone());
        Self {
            config,
            pool,
            notifier,
        }
    }

    /// Today's date at the operator-local offset
    pub fn local_today(&self) -> chrono::NaiveDate {
        let hours = self.config.tz_offset_hours.clamp(-23, 23);
        let offset = chrono::FixedOffset::east_opt(hours * 3600)
            .unwrap_or_else(|| chrono::FixedOffset::east_opt(0).unwrap());
        chrono::Utc::now().with_timezone(&offset).date_naive()
    }
}
