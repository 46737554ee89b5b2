//! Tier state machine
//!
//! Per organization the authoritative tier lives in one row guarded by the
//! mode flag. Every automatic writer goes through `apply_automatic_result`,
//! which delegates the mode check to a conditional UPDATE so a concurrent
//! manual override can never be clobbered.

use chrono::NaiveDate;
use common::models::{Organization, Tier};
use common::period::rolling_window;
use common::{Error, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db_err;
use crate::{activity, classify, scoring};

/// Outcome of one automatic classification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierChange {
    Upgraded { from: Tier, to: Tier },
    Downgraded { from: Tier, to: Tier },
    Unchanged { tier: Tier },
    /// The organization is under a manual override; the result was discarded
    Overridden,
}

impl TierChange {
    pub fn from_transition(prev: Tier, new: Tier) -> Self {
        match new.cmp(&prev) {
            std::cmp::Ordering::Greater => TierChange::Upgraded {
                from: prev,
                to: new,
            },
            std::cmp::Ordering::Less => TierChange::Downgraded {
                from: prev,
                to: new,
            },
            std::cmp::Ordering::Equal => TierChange::Unchanged { tier: new },
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            TierChange::Upgraded { .. } => "upgraded",
            TierChange::Downgraded { .. } => "downgraded",
            TierChange::Unchanged { .. } => "unchanged",
            TierChange::Overridden => "overridden",
        }
    }

    pub fn from_tier(&self) -> Option<Tier> {
        match self {
            TierChange::Upgraded { from, .. } | TierChange::Downgraded { from, .. } => Some(*from),
            TierChange::Unchanged { tier } => Some(*tier),
            TierChange::Overridden => None,
        }
    }

    pub fn to_tier(&self) -> Option<Tier> {
        match self {
            TierChange::Upgraded { to, .. } | TierChange::Downgraded { to, .. } => Some(*to),
            TierChange::Unchanged { tier } => Some(*tier),
            TierChange::Overridden => None,
        }
    }
}

/// Apply a classifier result to an organization
///
/// No-op (`Overridden`) while the organization is in manual mode. The
/// read-of-mode and write-of-tier are one conditional statement in the db
/// layer, so this is safe against racing overrides.
pub async fn apply_automatic_result(
    pool: &PgPool,
    organization_id: Uuid,
    new_tier: Tier,
) -> Result<TierChange> {
    match db::organizations::update_tier_if_automatic(pool, organization_id, new_tier)
        .await
        .map_err(db_err)?
    {
        Some(prev) => {
            let change = TierChange::from_transition(prev, new_tier);
            if !matches!(change, TierChange::Unchanged { .. }) {
                info!(
                    "Organization {} tier {}: {} -> {}",
                    organization_id,
                    change.status(),
                    prev,
                    new_tier
                );
            }
            Ok(change)
        }
        None => {
            // Guard rejected the write: manual mode, or no such organization
            match db::organizations::get(pool, organization_id)
                .await
                .map_err(db_err)?
            {
                Some(_) => Ok(TierChange::Overridden),
                None => Err(Error::NotFound(format!(
                    "organization {organization_id}"
                ))),
            }
        }
    }
}

/// Reclassify one organization in performance mode over `[start, end)`
pub async fn reclassify_performance(
    pool: &PgPool,
    organization_id: Uuid,
    criteria: &[common::models::TierCriterion],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TierChange> {
    let window = activity::load_window(pool, organization_id, start, end).await?;
    let tier = classify::classify_by_performance(&window, criteria);
    apply_automatic_result(pool, organization_id, tier).await
}

/// Reclassify one organization in contribution mode over `[start, end)`
pub async fn reclassify_contribution(
    pool: &PgPool,
    organization_id: Uuid,
    settings: &common::models::ScoreSettings,
    criteria: &[common::models::TierCriterion],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TierChange> {
    let window = activity::load_window(pool, organization_id, start, end).await?;
    let score = scoring::compute_score(&window, settings)?;
    let tier = classify::classify_by_score(score.total, criteria);
    apply_automatic_result(pool, organization_id, tier).await
}

/// Set or clear an administrator's manual tier override
///
/// A non-null tier pins the organization to `MANUAL` mode and records the
/// admin for audit. A null tier returns it to `AUTOMATIC` and immediately
/// reclassifies so the organization does not sit on a stale value.
pub async fn set_manual_tier(
    pool: &PgPool,
    organization_id: Uuid,
    tier: Option<Tier>,
    admin_id: Uuid,
    today: NaiveDate,
    rolling_months: u32,
) -> Result<Organization> {
    match tier {
        Some(tier) => {
            let org = db::organizations::set_manual_tier(pool, organization_id, tier, admin_id)
                .await
                .map_err(db_err)?
                .ok_or_else(|| Error::NotFound(format!("organization {organization_id}")))?;
            info!(
                "Organization {} manually set to {} by admin {}",
                organization_id, tier, admin_id
            );
            Ok(org)
        }
        None => {
            db::organizations::clear_manual_tier(pool, organization_id)
                .await
                .map_err(db_err)?
                .ok_or_else(|| Error::NotFound(format!("organization {organization_id}")))?;
            info!(
                "Organization {} override cleared by admin {}, reclassifying",
                organization_id, admin_id
            );

            let criteria = db::settings::tier_criteria(pool).await.map_err(db_err)?;
            let (start, end) = rolling_window(today, rolling_months);
            reclassify_performance(pool, organization_id, &criteria, start, end).await?;

            db::organizations::get(pool, organization_id)
                .await
                .map_err(db_err)?
                .ok_or_else(|| Error::NotFound(format!("organization {organization_id}")))
        }
    }
}

/// Equivalent to `set_manual_tier` with a null tier
pub async fn remove_manual_tier(
    pool: &PgPool,
    organization_id: Uuid,
    admin_id: Uuid,
    today: NaiveDate,
    rolling_months: u32,
) -> Result<Organization> {
    set_manual_tier(pool, organization_id, None, admin_id, today, rolling_months).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_direction() {
        assert_eq!(
            TierChange::from_transition(Tier::Light, Tier::Elite),
            TierChange::Upgraded {
                from: Tier::Light,
                to: Tier::Elite
            }
        );
        assert_eq!(
            TierChange::from_transition(Tier::Legend, Tier::Standard),
            TierChange::Downgraded {
                from: Tier::Legend,
                to: Tier::Standard
            }
        );
        assert_eq!(
            TierChange::from_transition(Tier::Advance, Tier::Advance),
            TierChange::Unchanged {
                tier: Tier::Advance
            }
        );
    }

    #[test]
    fn test_overridden_has_no_tiers() {
        assert_eq!(TierChange::Overridden.from_tier(), None);
        assert_eq!(TierChange::Overridden.to_tier(), None);
        assert_eq!(TierChange::Overridden.status(), "overridden");
    }
}
