//! Ranking snapshot builder
//!
//! One build = one period = one transaction. Settings are read once per
//! build, so a concurrent settings change cannot split a single snapshot
//! across two weight configurations.

use common::models::RankingSnapshotEntry;
use common::period::Period;
use common::{Error, Result};
use sqlx::PgPool;
use tracing::info;

use crate::db_err;
use crate::ranking::{assign_ranks, ScoredOrganization};
use crate::{activity, scoring};

/// Build and persist the snapshot for a period
///
/// Every participating organization gets an entry, including those with zero
/// activity; absence from a snapshot always means "not participating". A
/// period that already has entries is rejected with `DuplicatePeriod` unless
/// `supersede` is set, in which case the prior entries are replaced in the
/// same transaction.
pub async fn build_snapshot(
    pool: &PgPool,
    period: &Period,
    supersede: bool,
) -> Result<Vec<RankingSnapshotEntry>> {
    let settings = db::settings::score_settings(pool).await.map_err(db_err)?;
    settings.validate()?;

    let participants = db::participation::participating_organizations(pool)
        .await
        .map_err(db_err)?;

    info!(
        "Building {} snapshot {}..{} for {} participants",
        period.period_type,
        period.start,
        period.end,
        participants.len()
    );

    let mut scored = Vec::with_capacity(participants.len());
    for org in &participants {
        let window = activity::load_window(pool, org.id, period.start, period.end).await?;
        let breakdown = scoring::compute_score(&window, &settings)?;
        scored.push(ScoredOrganization {
            organization_id: org.id,
            tier: org.current_tier,
            total_sales: window.total_sales,
            order_count: window.order_count,
            breakdown,
        });
    }

    let ranked = assign_ranks(scored);

    let mut entries = Vec::with_capacity(ranked.len());
    for r in ranked {
        let prev = db::snapshots::latest_entry_before(
            pool,
            r.scored.organization_id,
            period.period_type,
            period.start,
        )
        .await
        .map_err(db_err)?;

        let (prev_rank, rank_change, score_change) = match &prev {
            Some(p) => (
                Some(p.rank),
                p.rank - r.rank,
                r.scored.breakdown.total - p.total_score,
            ),
            None => (None, 0, 0.0),
        };

        entries.push(RankingSnapshotEntry {
            organization_id: r.scored.organization_id,
            period_type: period.period_type,
            period_start: period.start,
            period_end: period.end,
            rank: r.rank,
            total_score: r.scored.breakdown.total,
            tier: r.scored.tier,
            total_sales: r.scored.total_sales,
            order_count: r.scored.order_count,
            sales_points: r.scored.breakdown.sales_points,
            order_points: r.scored.breakdown.order_points,
            activity_points: r.scored.breakdown.activity_points(),
            prev_rank,
            rank_change,
            score_change,
        });
    }

    let mut tx = pool.begin().await.map_err(db_err)?;

    if db::snapshots::period_exists(&mut *tx, period)
        .await
        .map_err(db_err)?
    {
        if !supersede {
            return Err(Error::DuplicatePeriod {
                period_type: period.period_type.to_string(),
                period_start: period.start,
            });
        }
        let removed = db::snapshots::delete_period(&mut *tx, period)
            .await
            .map_err(db_err)?;
        info!(
            "Superseding {} prior entries for {} period starting {}",
            removed, period.period_type, period.start
        );
    }

    for entry in &entries {
        db::snapshots::insert_entry(&mut *tx, entry)
            .await
            .map_err(db_err)?;
    }

    tx.commit().await.map_err(db_err)?;

    info!(
        "Snapshot complete: {} entries for {} period starting {}",
        entries.len(),
        period.period_type,
        period.start
    );

    Ok(entries)
}
