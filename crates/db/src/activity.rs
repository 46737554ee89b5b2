//! Daily activity counters
//!
//! One row per organization per local date, updated on each qualifying
//! activity event and aggregated into an `ActivityWindow` on demand.

use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Raw sums over a `[start, end)` window, before streak detection
#[derive(Debug, Clone, Default)]
pub struct ActivityTotals {
    pub total_sales: i64,
    pub order_count: i64,
    pub post_count: i64,
    pub comment_count: i64,
    pub login_days: i64,
}

/// Aggregate an organization's activity over `[start, end)`
///
/// Returns zeroed totals when no rows exist; absence of activity is not an
/// error.
pub async fn window_totals(
    pool: &PgPool,
    organization_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ActivityTotals, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COALESCE(SUM(total_sales), 0)::BIGINT AS total_sales,
            COALESCE(SUM(order_count), 0)::BIGINT AS order_count,
            COALESCE(SUM(post_count), 0)::BIGINT AS post_count,
            COALESCE(SUM(comment_count), 0)::BIGINT AS comment_count,
            COUNT(*) FILTER (WHERE logged_in) AS login_days
        FROM seller_activity_daily
        WHERE organization_id = $1 AND date >= $2 AND date < $3
        "#,
    )
    .bind(organization_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(ActivityTotals {
        total_sales: row.get("total_sales"),
        order_count: row.get("order_count"),
        post_count: row.get("post_count"),
        comment_count: row.get("comment_count"),
        login_days: row.get("login_days"),
    })
}

/// Dates in `[start, end)` on which the organization shipped at least one
/// order, ascending; feeds streak detection
pub async fn active_order_days(
    pool: &PgPool,
    organization_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT date
        FROM seller_activity_daily
        WHERE organization_id = $1 AND date >= $2 AND date < $3 AND order_count > 0
        ORDER BY date
        "#,
    )
    .bind(organization_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.get("date")).collect())
}

/// Order shipped: count the order and add its amount to the day's sales
pub async fn record_order_shipped(
    pool: &PgPool,
    organization_id: Uuid,
    date: NaiveDate,
    amount: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO seller_activity_daily (organization_id, date, total_sales, order_count, updated_at)
        VALUES ($1, $2, $3, 1, NOW())
        ON CONFLICT (organization_id, date) DO UPDATE
        SET total_sales = seller_activity_daily.total_sales + EXCLUDED.total_sales,
            order_count = seller_activity_daily.order_count + 1,
            updated_at = NOW()
        "#,
    )
    .bind(organization_id)
    .bind(date)
    .bind(amount)
    .execute(pool)
    .await?;

    Ok(())
}

/// Feed post published
pub async fn record_post(
    pool: &PgPool,
    organization_id: Uuid,
    date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO seller_activity_daily (organization_id, date, post_count, updated_at)
        VALUES ($1, $2, 1, NOW())
        ON CONFLICT (organization_id, date) DO UPDATE
        SET post_count = seller_activity_daily.post_count + 1,
            updated_at = NOW()
        "#,
    )
    .bind(organization_id)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(())
}

/// Comment written
pub async fn record_comment(
    pool: &PgPool,
    organization_id: Uuid,
    date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO seller_activity_daily (organization_id, date, comment_count, updated_at)
        VALUES ($1, $2, 1, NOW())
        ON CONFLICT (organization_id, date) DO UPDATE
        SET comment_count = seller_activity_daily.comment_count + 1,
            updated_at = NOW()
        "#,
    )
    .bind(organization_id)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(())
}

/// Login: at most one credit per local date
pub async fn record_login(
    pool: &PgPool,
    organization_id: Uuid,
    date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO seller_activity_daily (organization_id, date, logged_in, updated_at)
        VALUES ($1, $2, TRUE, NOW())
        ON CONFLICT (organization_id, date) DO UPDATE
        SET logged_in = TRUE,
            updated_at = NOW()
        "#,
    )
    .bind(organization_id)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(())
}
