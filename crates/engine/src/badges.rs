//! Badge evaluation and awarding

use common::models::{Badge, RankingSnapshotEntry, PeriodType, Tier};
use common::Result;
use sqlx::PgPool;
use tracing::info;

use crate::db_err;

/// Badge definitions
pub mod defs {
    pub const PODIUM_FINISH: &str = "podium_finish";
    pub const SCORE_OVER_1000: &str = "score_over_1000";
    pub const VOLUME_KING: &str = "volume_king";
    pub const ELITE_REACHED: &str = "elite_reached";
    pub const MOST_IMPROVED: &str = "most_improved";
}

/// How a badge is earned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BadgeRule {
    /// Rank at or above a cutoff (1 is best)
    RankAtMost(i32),
    /// Total score meets an absolute threshold
    ScoreAtLeast(f64),
    /// Monthly order volume meets a threshold
    OrderCountAtLeast(i64),
    /// Holding the given tier or higher, awarded once ever
    TierReached(Tier),
    /// Climbed at least this many rank positions since the prior period
    RankImprovedAtLeast(i32),
}

/// A badge definition: stable id plus its rule
#[derive(Debug, Clone, Copy)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub rule: BadgeRule,
}

/// The built-in definition set evaluated against every monthly snapshot
pub fn default_definitions() -> Vec<BadgeDefinition> {
    vec![
        BadgeDefinition {
            id: defs::PODIUM_FINISH,
            rule: BadgeRule::RankAtMost(3),
        },
        BadgeDefinition {
            id: defs::SCORE_OVER_1000,
            rule: BadgeRule::ScoreAtLeast(1000.0),
        },
        BadgeDefinition {
            id: defs::VOLUME_KING,
            rule: BadgeRule::OrderCountAtLeast(1000),
        },
        BadgeDefinition {
            id: defs::ELITE_REACHED,
            rule: BadgeRule::TierReached(Tier::Elite),
        },
        BadgeDefinition {
            id: defs::MOST_IMPROVED,
            rule: BadgeRule::RankImprovedAtLeast(5),
        },
    ]
}

/// Whether a snapshot entry satisfies a rule
pub fn qualifies(rule: &BadgeRule, entry: &RankingSnapshotEntry) -> bool {
    match rule {
        BadgeRule::RankAtMost(max_rank) => entry.rank <= *max_rank,
        BadgeRule::ScoreAtLeast(threshold) => entry.total_score >= *threshold,
        BadgeRule::OrderCountAtLeast(count) => entry.order_count >= *count,
        BadgeRule::TierReached(tier) => entry.tier >= *tier,
        // rank_change is prior rank minus current rank, positive when the
        // organization climbed; unranked-before organizations never qualify
        BadgeRule::RankImprovedAtLeast(positions) => {
            entry.prev_rank.is_some() && entry.rank_change >= *positions
        }
    }
}

/// Evaluate all definitions against a completed monthly snapshot
///
/// Re-running over the same snapshot is a no-op: awards are keyed by
/// (organization, period month, badge) and only newly inserted badges are
/// returned. Non-monthly snapshots award nothing.
pub async fn award_badges(
    pool: &PgPool,
    entries: &[RankingSnapshotEntry],
) -> Result<Vec<Badge>> {
    let Some(first) = entries.first() else {
        return Ok(Vec::new());
    };
    if first.period_type != PeriodType::Monthly {
        return Ok(Vec::new());
    }

    let definitions = default_definitions();
    let mut awarded = Vec::new();

    for entry in entries {
        for def in &definitions {
            if !qualifies(&def.rule, entry) {
                continue;
            }

            // First-time-only badges skip organizations that earned them in
            // any earlier period
            if matches!(def.rule, BadgeRule::TierReached(_))
                && db::badges::has_badge(pool, entry.organization_id, def.id)
                    .await
                    .map_err(db_err)?
            {
                continue;
            }

            if let Some(badge) =
                db::badges::award(pool, entry.organization_id, entry.period_start, def.id)
                    .await
                    .map_err(db_err)?
            {
                info!(
                    "🏆 Badge {} awarded to organization {} for {}",
                    def.id, entry.organization_id, entry.period_start
                );
                awarded.push(badge);
            }
        }
    }

    Ok(awarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn make_entry(rank: i32, score: f64, orders: i64, tier: Tier) -> RankingSnapshotEntry {
        RankingSnapshotEntry {
            organization_id: Uuid::new_v4(),
            period_type: PeriodType::Monthly,
            period_start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            rank,
            total_score: score,
            tier,
            total_sales: 0,
            order_count: orders,
            sales_points: 0.0,
            order_points: 0.0,
            activity_points: 0.0,
            prev_rank: None,
            rank_change: 0,
            score_change: 0.0,
        }
    }

    #[test]
    fn test_podium_is_top_three_only() {
        let rule = BadgeRule::RankAtMost(3);
        assert!(qualifies(&rule, &make_entry(1, 0.0, 0, Tier::Light)));
        assert!(qualifies(&rule, &make_entry(3, 0.0, 0, Tier::Light)));
        assert!(!qualifies(&rule, &make_entry(4, 0.0, 0, Tier::Light)));
    }

    #[test]
    fn test_score_threshold_is_inclusive() {
        let rule = BadgeRule::ScoreAtLeast(1000.0);
        assert!(qualifies(&rule, &make_entry(10, 1000.0, 0, Tier::Light)));
        assert!(!qualifies(&rule, &make_entry(10, 999.9, 0, Tier::Light)));
    }

    #[test]
    fn test_volume_king_threshold() {
        let rule = BadgeRule::OrderCountAtLeast(1000);
        assert!(qualifies(&rule, &make_entry(10, 0.0, 1200, Tier::Light)));
        assert!(!qualifies(&rule, &make_entry(10, 0.0, 999, Tier::Light)));
    }

    #[test]
    fn test_most_improved_needs_a_prior_rank() {
        let rule = BadgeRule::RankImprovedAtLeast(5);

        let mut entry = make_entry(2, 0.0, 0, Tier::Light);
        entry.prev_rank = Some(7);
        entry.rank_change = 5;
        assert!(qualifies(&rule, &entry));

        entry.rank_change = 4;
        assert!(!qualifies(&rule, &entry));

        // First appearance on the board is not an improvement
        entry.prev_rank = None;
        entry.rank_change = 10;
        assert!(!qualifies(&rule, &entry));
    }

    #[test]
    fn test_tier_reached_includes_higher_tiers() {
        let rule = BadgeRule::TierReached(Tier::Elite);
        assert!(qualifies(&rule, &make_entry(10, 0.0, 0, Tier::Elite)));
        assert!(qualifies(&rule, &make_entry(10, 0.0, 0, Tier::Legend)));
        assert!(!qualifies(&rule, &make_entry(10, 0.0, 0, Tier::Advance)));
    }
}
