//! Background period scheduler
//!
//! Pure trigger: wakes at each operator-local midnight and calls into the
//! snapshot builder, badge awarder and batch runner. No business logic
//! lives here.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc};
use common::period::{rolling_window, Period};
use sqlx::PgPool;
use tracing::{error, info};

use crate::{badges, batch, snapshot};

/// Configuration for the schedule service
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Operator-local offset from UTC in hours
    pub tz_offset_hours: i32,
    /// Max concurrent reclassifications in the monthly batch
    pub batch_concurrency: usize,
    /// Performance-mode rolling window length in months
    pub rolling_window_months: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tz_offset_hours: 9,
            batch_concurrency: 8,
            rolling_window_months: 3,
        }
    }
}

/// Background service driving the daily/weekly/monthly cadence
pub struct ScheduleService {
    pool: PgPool,
    config: ScheduleConfig,
}

impl ScheduleService {
    pub fn new(pool: PgPool, config: ScheduleConfig) -> Self {
        Self { pool, config }
    }

    fn offset(&self) -> FixedOffset {
        let hours = self.config.tz_offset_hours.clamp(-23, 23);
        FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Start the midnight loop
    pub async fn run(self) {
        info!(
            "Starting schedule service (UTC offset {:+}h)",
            self.config.tz_offset_hours
        );

        loop {
            let offset = self.offset();
            let now_local = Utc::now().with_timezone(&offset).naive_local();
            let next_midnight = (now_local.date() + Duration::days(1))
                .and_hms_opt(0, 0, 0)
                .unwrap_or(now_local);
            let until = (next_midnight - now_local)
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60));

            tokio::time::sleep(until).await;

            let today = Utc::now().with_timezone(&self.offset()).date_naive();
            if let Err(e) = self.run_for(today).await {
                error!("Scheduled run for {} failed: {}", today, e);
            }
        }
    }

    /// Execute everything due at the local midnight beginning `today`
    ///
    /// Each step is independently idempotent (supersede rebuilds, keyed
    /// badges, convergent batch), so a crashed run can simply be repeated.
    pub async fn run_for(&self, today: NaiveDate) -> common::Result<()> {
        let yesterday = today - Duration::days(1);

        snapshot::build_snapshot(&self.pool, &Period::daily(yesterday), true).await?;

        // The weekly snapshot is rebuilt every night and settles once the
        // week is over
        snapshot::build_snapshot(&self.pool, &Period::weekly_containing(yesterday), true).await?;

        if today.day() == 1 {
            info!("First of month: finalizing monthly snapshot and reclassifying fleet");

            let month = Period::previous_month_of(today);
            let entries = snapshot::build_snapshot(&self.pool, &month, true).await?;
            let awarded = badges::award_badges(&self.pool, &entries).await?;
            info!("Awarded {} badges for {}", awarded.len(), month.start);

            let (start, end) = rolling_window(today, self.config.rolling_window_months);
            batch::run_monthly_batch(&self.pool, start, end, self.config.batch_concurrency)
                .await?;
        }

        Ok(())
    }
}
