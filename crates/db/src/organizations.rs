//! Organization queries
//!
//! The organizations table is owned by the identity subsystem; this module
//! only reads rows and mutates the tier columns. All tier writes go through
//! the guarded statements below.

use common::models::{Organization, Tier};
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn org_from_row(row: &sqlx::postgres::PgRow) -> Result<Organization, sqlx::Error> {
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
}

const ORG_COLUMNS: &str = "id, owner_user_id, name, current_tier, tier_mode, \
     tier_overridden_by, tier_overridden_at, created_at, updated_at";

/// Get an organization by id
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Organization>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {ORG_COLUMNS} FROM organizations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(org_from_row).transpose()
}

/// List all seller organization ids, for the batch runner
pub async fn list_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query("SELECT id FROM organizations ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.get("id")).collect())
}

/// Conditionally apply an automatically computed tier
///
/// The mode check and the tier write are one statement so an automatic
/// result can never land over a manual override set concurrently. Returns
/// the previous tier when the write happened, `None` when the guard
/// rejected it (manual mode) or the organization does not exist.
pub async fn update_tier_if_automatic(
    pool: &PgPool,
    id: Uuid,
    new_tier: Tier,
) -> Result<Option<Tier>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE organizations o
        SET current_tier = $2, updated_at = NOW()
        FROM (
            SELECT id, current_tier AS prev_tier
            FROM organizations
            WHERE id = $1
            FOR UPDATE
        ) prev
        WHERE o.id = prev.id AND o.tier_mode = 'AUTOMATIC'
        RETURNING prev.prev_tier
        "#,
    )
    .bind(id)
    .bind(new_tier.as_str())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => {
            let prev: String = r.get("prev_tier");
            Ok(Some(crate::decode_label(&prev)?))
        }
        None => Ok(None),
    }
}

/// Pin an organization to an admin-chosen tier
pub async fn set_manual_tier(
    pool: &PgPool,
    id: Uuid,
    tier: Tier,
    admin_id: Uuid,
) -> Result<Option<Organization>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE organizations
        SET current_tier = $2,
            tier_mode = 'MANUAL',
            tier_overridden_by = $3,
            tier_overridden_at = NOW(),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {ORG_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(tier.as_str())
    .bind(admin_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(org_from_row).transpose()
}

/// Drop a manual override and return control to automatic classification
///
/// The caller is expected to reclassify immediately afterwards so the
/// organization does not sit on a stale tier.
pub async fn clear_manual_tier(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Organization>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE organizations
        SET tier_mode = 'AUTOMATIC',
            tier_overridden_by = NULL,
            tier_overridden_at = NULL,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {ORG_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(org_from_row).transpose()
}
