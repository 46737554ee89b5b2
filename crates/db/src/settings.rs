//! Score settings and tier criteria queries

use common::models::{ScoreSettings, Tier, TierCriterion};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Fixed id of the singleton settings row
pub const SCORE_SETTINGS_ID: Uuid = Uuid::from_u128(1);

/// Read the global score settings
pub async fn score_settings(pool: &PgPool) -> Result<ScoreSettings, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT sales_per_point, orders_per_point, weekly_consecutive_bonus,
               monthly_consecutive_bonus, post_score, comment_score, login_score
        FROM ranking_score_settings
        WHERE id = $1
        "#,
    )
    .bind(SCORE_SETTINGS_ID)
    .fetch_one(pool)
    .await?;

    Ok(ScoreSettings {
        sales_per_point: row.get("sales_per_point"),
        orders_per_point: row.get("orders_per_point"),
        weekly_consecutive_bonus: row.get("weekly_consecutive_bonus"),
        monthly_consecutive_bonus: row.get("monthly_consecutive_bonus"),
        post_score: row.get("post_score"),
        comment_score: row.get("comment_score"),
        login_score: row.get("login_score"),
    })
}

/// Replace the global score settings
///
/// Changes are prospective only; already-written snapshots keep the scores
/// they were computed with.
pub async fn update_score_settings(
    pool: &PgPool,
    settings: &ScoreSettings,
) -> Result<ScoreSettings, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE ranking_score_settings
        SET sales_per_point = $2,
            orders_per_point = $3,
            weekly_consecutive_bonus = $4,
            monthly_consecutive_bonus = $5,
            post_score = $6,
            comment_score = $7,
            login_score = $8,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(SCORE_SETTINGS_ID)
    .bind(settings.sales_per_point)
    .bind(settings.orders_per_point)
    .bind(settings.weekly_consecutive_bonus)
    .bind(settings.monthly_consecutive_bonus)
    .bind(settings.post_score)
    .bind(settings.comment_score)
    .bind(settings.login_score)
    .execute(pool)
    .await?;

    score_settings(pool).await
}

/// All tier criteria rows; classification order is the classifier's concern
pub async fn tier_criteria(pool: &PgPool) -> Result<Vec<TierCriterion>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT tier, min_order_count, min_total_sales, min_score FROM tier_criteria",
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let tier: String = row.get("tier");
            Ok(TierCriterion {
                tier: crate::decode_label::<Tier>(&tier)?,
                min_order_count: row.get("min_order_count"),
                min_total_sales: row.get("min_total_sales"),
                min_score: row.get("min_score"),
            })
        })
        .collect()
}

/// Upsert one tier's thresholds
pub async fn upsert_tier_criterion(
    pool: &PgPool,
    criterion: &TierCriterion,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tier_criteria (tier, min_order_count, min_total_sales, min_score, updated_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (tier) DO UPDATE
        SET min_order_count = EXCLUDED.min_order_count,
            min_total_sales = EXCLUDED.min_total_sales,
            min_score = EXCLUDED.min_score,
            updated_at = NOW()
        "#,
    )
    .bind(criterion.tier.as_str())
    .bind(criterion.min_order_count)
    .bind(criterion.min_total_sales)
    .bind(criterion.min_score)
    .execute(pool)
    .await?;

    Ok(())
}
