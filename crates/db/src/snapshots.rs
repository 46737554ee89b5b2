//! Ranking snapshot queries
//!
//! Snapshot rows are append-only per period; replacement only happens inside
//! the builder's supersede transaction.

use chrono::NaiveDate;
use common::models::{PeriodType, RankingSnapshotEntry};
use common::period::Period;
use sqlx::{PgExecutor, PgPool, Row};
use uuid::Uuid;

fn entry_from_row(row: &sqlx::postgres::PgRow) -> Result<RankingSnapshotEntry, sqlx::Error> {
    let period_type: String = row.get("period_type");
    let tier: String = row.get("tier");
    Ok(RankingSnapshotEntry {
        organization_id: row.get("organization_id"),
        period_type: crate::decode_label(&period_type)?,
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        rank: row.get("rank"),
        total_score: row.get("total_score"),
        tier: crate::decode_label(&tier)?,
        total_sales: row.get("total_sales"),
        order_count: row.get("order_count"),
        sales_points: row.get("sales_points"),
        order_points: row.get("order_points"),
        activity_points: row.get("activity_points"),
        prev_rank: row.get("prev_rank"),
        rank_change: row.get("rank_change"),
        score_change: row.get("score_change"),
    })
}

const ENTRY_COLUMNS: &str = "organization_id, period_type, period_start, period_end, rank, \
     total_score, tier, total_sales, order_count, sales_points, order_points, \
     activity_points, prev_rank, rank_change, score_change";

/// Whether any entries exist for a period key
pub async fn period_exists<'e, E: PgExecutor<'e>>(
    executor: E,
    period: &Period,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM ranking_snapshots
            WHERE period_type = $1 AND period_start = $2
        ) AS exists
        "#,
    )
    .bind(period.period_type.as_str())
    .bind(period.start)
    .fetch_one(executor)
    .await?;

    Ok(row.get::<bool, _>("exists"))
}

/// Remove all entries for a period key, as part of a supersede transaction
pub async fn delete_period<'e, E: PgExecutor<'e>>(
    executor: E,
    period: &Period,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM ranking_snapshots WHERE period_type = $1 AND period_start = $2",
    )
    .bind(period.period_type.as_str())
    .bind(period.start)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Insert one snapshot entry
pub async fn insert_entry<'e, E: PgExecutor<'e>>(
    executor: E,
    entry: &RankingSnapshotEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ranking_snapshots
            (organization_id, period_type, period_start, period_end, rank,
             total_score, tier, total_sales, order_count, sales_points,
             order_points, activity_points, prev_rank, rank_change, score_change,
             created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, NOW())
        "#,
    )
    .bind(entry.organization_id)
    .bind(entry.period_type.as_str())
    .bind(entry.period_start)
    .bind(entry.period_end)
    .bind(entry.rank)
    .bind(entry.total_score)
    .bind(entry.tier.as_str())
    .bind(entry.total_sales)
    .bind(entry.order_count)
    .bind(entry.sales_points)
    .bind(entry.order_points)
    .bind(entry.activity_points)
    .bind(entry.prev_rank)
    .bind(entry.rank_change)
    .bind(entry.score_change)
    .execute(executor)
    .await?;

    Ok(())
}

/// Most recent snapshotted period start for a cadence
pub async fn latest_period_start(
    pool: &PgPool,
    period_type: PeriodType,
) -> Result<Option<NaiveDate>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT MAX(period_start) AS period_start FROM ranking_snapshots WHERE period_type = $1",
    )
    .bind(period_type.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row.get("period_start"))
}

/// Entries for a period, best rank first
pub async fn entries_for_period(
    pool: &PgPool,
    period_type: PeriodType,
    period_start: NaiveDate,
    limit: i64,
) -> Result<Vec<RankingSnapshotEntry>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM ranking_snapshots
        WHERE period_type = $1 AND period_start = $2
        ORDER BY rank ASC, organization_id ASC
        LIMIT $3
        "#
    ))
    .bind(period_type.as_str())
    .bind(period_start)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(entry_from_row).collect()
}

/// An organization's latest entry for a cadence
pub async fn latest_entry_for_org(
    pool: &PgPool,
    organization_id: Uuid,
    period_type: PeriodType,
) -> Result<Option<RankingSnapshotEntry>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM ranking_snapshots
        WHERE organization_id = $1 AND period_type = $2
        ORDER BY period_start DESC
        LIMIT 1
        "#
    ))
    .bind(organization_id)
    .bind(period_type.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

/// An organization's most recent entry strictly before a period start, used
/// for rank/score deltas
pub async fn latest_entry_before(
    pool: &PgPool,
    organization_id: Uuid,
    period_type: PeriodType,
    before: NaiveDate,
) -> Result<Option<RankingSnapshotEntry>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM ranking_snapshots
        WHERE organization_id = $1 AND period_type = $2 AND period_start < $3
        ORDER BY period_start DESC
        LIMIT 1
        "#
    ))
    .bind(organization_id)
    .bind(period_type.as_str())
    .bind(before)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}
