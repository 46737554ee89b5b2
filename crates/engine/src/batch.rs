//! Monthly reclassification batch
//!
//! Settings and criteria are read once per run: a configuration change
//! mid-batch applies to the next run, never to part of this one. Each
//! organization is independent, so the batch is not one transaction; a
//! re-run after a crash recomputes and converges.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use common::models::Tier;
use common::Result;

use crate::db_err;
use crate::tier_state::{self, TierChange};

/// Classification outcome for one organization
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationOutcome {
    pub organization_id: Uuid,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Upgraded,
    Downgraded,
    Unchanged,
    SkippedManual,
    Failed,
}

impl OrganizationOutcome {
    fn from_change(organization_id: Uuid, change: &TierChange) -> Self {
        let status = match change {
            TierChange::Upgraded { .. } => OutcomeStatus::Upgraded,
            TierChange::Downgraded { .. } => OutcomeStatus::Downgraded,
            TierChange::Unchanged { .. } => OutcomeStatus::Unchanged,
            TierChange::Overridden => OutcomeStatus::SkippedManual,
        };
        Self {
            organization_id,
            status,
            from: change.from_tier(),
            to: change.to_tier(),
            error: None,
        }
    }

    fn failed(organization_id: Uuid, reason: String) -> Self {
        Self {
            organization_id,
            status: OutcomeStatus::Failed,
            from: None,
            to: None,
            error: Some(reason),
        }
    }
}

/// Aggregate result of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub upgraded: usize,
    pub downgraded: usize,
    pub unchanged: usize,
    pub skipped_manual: usize,
    pub failed: usize,
    pub outcomes: Vec<OrganizationOutcome>,
}

/// Tally per-organization outcomes into a summary
pub fn tally(outcomes: Vec<OrganizationOutcome>) -> BatchSummary {
    let mut summary = BatchSummary {
        total: outcomes.len(),
        upgraded: 0,
        downgraded: 0,
        unchanged: 0,
        skipped_manual: 0,
        failed: 0,
        outcomes,
    };
    for outcome in &summary.outcomes {
        match outcome.status {
            OutcomeStatus::Upgraded => summary.upgraded += 1,
            OutcomeStatus::Downgraded => summary.downgraded += 1,
            OutcomeStatus::Unchanged => summary.unchanged += 1,
            OutcomeStatus::SkippedManual => summary.skipped_manual += 1,
            OutcomeStatus::Failed => summary.failed += 1,
        }
    }
    summary
}

/// Reclassify every seller organization over `[window_start, window_end)`
///
/// Organizations are processed with bounded concurrency; a failure on one is
/// recorded in the summary and does not abort the others.
pub async fn run_monthly_batch(
    pool: &PgPool,
    window_start: NaiveDate,
    window_end: NaiveDate,
    concurrency: usize,
) -> Result<BatchSummary> {
    let organization_ids = db::organizations::list_ids(pool).await.map_err(db_err)?;
    let criteria = db::settings::tier_criteria(pool).await.map_err(db_err)?;

    info!(
        "Monthly batch over {}..{} for {} organizations",
        window_start,
        window_end,
        organization_ids.len()
    );

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for organization_id in organization_ids {
        let pool = pool.clone();
        let criteria = criteria.clone();
        let semaphore = semaphore.clone();

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    return OrganizationOutcome::failed(organization_id, e.to_string());
                }
            };

            match tier_state::reclassify_performance(
                &pool,
                organization_id,
                &criteria,
                window_start,
                window_end,
            )
            .await
            {
                Ok(change) => OrganizationOutcome::from_change(organization_id, &change),
                Err(e) => {
                    warn!("Reclassification failed for {}: {}", organization_id, e);
                    OrganizationOutcome::failed(organization_id, e.to_string())
                }
            }
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => error!("Batch task panicked: {}", e),
        }
    }
    outcomes.sort_by_key(|o| o.organization_id);

    let summary = tally(outcomes);
    info!(
        "Batch complete: {} total, {} upgraded, {} downgraded, {} unchanged, {} manual, {} failed",
        summary.total,
        summary.upgraded,
        summary.downgraded,
        summary.unchanged,
        summary.skipped_manual,
        summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: OutcomeStatus) -> OrganizationOutcome {
        OrganizationOutcome {
            organization_id: Uuid::new_v4(),
            status,
            from: None,
            to: None,
            error: None,
        }
    }

    #[test]
    fn test_tally_counts_by_status() {
        let summary = tally(vec![
            outcome(OutcomeStatus::Upgraded),
            outcome(OutcomeStatus::Upgraded),
            outcome(OutcomeStatus::Downgraded),
            outcome(OutcomeStatus::Unchanged),
            outcome(OutcomeStatus::SkippedManual),
            outcome(OutcomeStatus::Failed),
        ]);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.upgraded, 2);
        assert_eq!(summary.downgraded, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.skipped_manual, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_tally_empty_batch() {
        let summary = tally(Vec::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.outcomes.is_empty());
    }
}
