//! Participation registry queries

use common::models::{Organization, ParticipationSetting, ParticipationUpdate};
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn setting_from_row(row: &sqlx::postgres::PgRow) -> ParticipationSetting {
    ParticipationSetting {
        owner_user_id: row.get("owner_user_id"),
        is_participating: row.get("is_participating"),
        show_score: row.get("show_score"),
        show_sales_performance: row.get("show_sales_performance"),
    }
}

/// Get an owner's participation setting
///
/// Returns the all-false default when no row exists; read-only callers must
/// not cause a write.
pub async fn get(pool: &PgPool, owner_user_id: Uuid) -> Result<ParticipationSetting, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT owner_user_id, is_participating, show_score, show_sales_performance
        FROM ranking_participation
        WHERE owner_user_id = $1
        "#,
    )
    .bind(owner_user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row
        .map(|r| setting_from_row(&r))
        .unwrap_or_else(|| ParticipationSetting::default_for(owner_user_id)))
}

/// Apply a partial update and upsert by owner
///
/// The merge enforces the invariant that opting out clears both visibility
/// flags in the same write.
pub async fn set(
    pool: &PgPool,
    owner_user_id: Uuid,
    update: &ParticipationUpdate,
) -> Result<ParticipationSetting, sqlx::Error> {
    let current = get(pool, owner_user_id).await?;
    let next = current.merged(update);

    let row = sqlx::query(
        r#"
        INSERT INTO ranking_participation
            (owner_user_id, is_participating, show_score, show_sales_performance, updated_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (owner_user_id) DO UPDATE
        SET is_participating = EXCLUDED.is_participating,
            show_score = EXCLUDED.show_score,
            show_sales_performance = EXCLUDED.show_sales_performance,
            updated_at = NOW()
        RETURNING owner_user_id, is_participating, show_score, show_sales_performance
        "#,
    )
    .bind(owner_user_id)
    .bind(next.is_participating)
    .bind(next.show_score)
    .bind(next.show_sales_performance)
    .fetch_one(pool)
    .await?;

    Ok(setting_from_row(&row))
}

/// All organizations whose owner has opted in, ordered by id for
/// deterministic snapshot input
pub async fn participating_organizations(pool: &PgPool) -> Result<Vec<Organization>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT o.id, o.owner_user_id, o.name, o.current_tier, o.tier_mode,
               o.tier_overridden_by, o.tier_overridden_at, o.created_at, o.updated_at
        FROM organizations o
        JOIN ranking_participation p ON p.owner_user_id = o.owner_user_id
        WHERE p.is_participating = TRUE
        ORDER BY o.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let tier: String = row.get("current_tier");
            let mode: String = row.get("tier_mode");
            Ok(Organization {
                id: row.get("id"),
                owner_user_id: row.get("owner_user_id"),
                name: row.get("name"),
                current_tier: crate::decode_label(&tier)?,
                tier_mode: crate::decode_label(&mode)?,
                tier_overridden_by: row.get("tier_overridden_by"),
                tier_overridden_at: row.get("tier_overridden_at"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
        })
        .collect()
}

/// Count of currently participating owners
pub async fn participant_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM ranking_participation WHERE is_participating = TRUE",
    )
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}
