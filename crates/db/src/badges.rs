//! Badge queries

use chrono::NaiveDate;
use common::models::Badge;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Award a badge, idempotently
///
/// Returns the badge only when it was newly inserted; a repeat award for the
/// same (organization, period month, badge) is a silent no-op.
pub async fn award(
    pool: &PgPool,
    organization_id: Uuid,
    period_month: NaiveDate,
    badge_id: &str,
) -> Result<Option<Badge>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO seller_badges (organization_id, period_month, badge_id, awarded_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (organization_id, period_month, badge_id) DO NOTHING
        RETURNING organization_id, period_month, badge_id, awarded_at
        "#,
    )
    .bind(organization_id)
    .bind(period_month)
    .bind(badge_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| Badge {
        organization_id: r.get("organization_id"),
        period_month: r.get("period_month"),
        badge_id: r.get("badge_id"),
        awarded_at: r.get("awarded_at"),
    }))
}

/// Whether the organization holds the badge for any period
pub async fn has_badge(
    pool: &PgPool,
    organization_id: Uuid,
    badge_id: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM seller_badges
            WHERE organization_id = $1 AND badge_id = $2
        ) AS exists
        "#,
    )
    .bind(organization_id)
    .bind(badge_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("exists"))
}

/// All badges for an organization, newest first
pub async fn list_for_organization(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<Badge>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT organization_id, period_month, badge_id, awarded_at
        FROM seller_badges
        WHERE organization_id = $1
        ORDER BY awarded_at DESC
        "#,
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Badge {
            organization_id: r.get("organization_id"),
            period_month: r.get("period_month"),
            badge_id: r.get("badge_id"),
            awarded_at: r.get("awarded_at"),
        })
        .collect())
}
