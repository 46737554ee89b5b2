//! Domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Seller classification labels, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Light,
    Standard,
    Advance,
    Elite,
    Legend,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Light,
        Tier::Standard,
        Tier::Advance,
        Tier::Elite,
        Tier::Legend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Light => "LIGHT",
            Tier::Standard => "STANDARD",
            Tier::Advance => "ADVANCE",
            Tier::Elite => "ELITE",
            Tier::Legend => "LEGEND",
        }
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIGHT" => Ok(Tier::Light),
            "STANDARD" => Ok(Tier::Standard),
            "ADVANCE" => Ok(Tier::Advance),
            "ELITE" => Ok(Tier::Elite),
            "LEGEND" => Ok(Tier::Legend),
            other => Err(Error::Config(format!("unknown tier label: {other}"))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an organization's tier is computed or admin-pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TierMode {
    Automatic,
    Manual,
}

impl TierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierMode::Automatic => "AUTOMATIC",
            TierMode::Manual => "MANUAL",
        }
    }
}

impl FromStr for TierMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTOMATIC" => Ok(TierMode::Automatic),
            "MANUAL" => Ok(TierMode::Manual),
            other => Err(Error::Config(format!("unknown tier mode: {other}"))),
        }
    }
}

/// A seller organization
///
/// The row is owned by the identity subsystem; the engine only reads it and
/// updates the tier columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub current_tier: Tier,
    pub tier_mode: TierMode,
    pub tier_overridden_by: Option<Uuid>,
    pub tier_overridden_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unit of a consecutive-activity streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakUnit {
    Week,
    Month,
}

/// A run of consecutive fully-active weeks or months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStreak {
    pub unit: StreakUnit,
    pub length: u32,
}

/// Aggregated activity for one organization over a `[start, end)` window
///
/// Always derived from the daily activity rows, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityWindow {
    /// Currency in minor units
    pub total_sales: i64,
    pub order_count: i64,
    pub post_count: i64,
    pub comment_count: i64,
    pub login_days: i64,
    pub streak: Option<ActivityStreak>,
}

/// Global score weight configuration, a single versionable row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSettings {
    pub sales_per_point: i64,
    pub orders_per_point: i64,
    pub weekly_consecutive_bonus: f64,
    pub monthly_consecutive_bonus: f64,
    pub post_score: f64,
    pub comment_score: f64,
    pub login_score: f64,
}

impl ScoreSettings {
    /// Reject divisor weights that would divide by zero and negative scores
    pub fn validate(&self) -> crate::Result<()> {
        if self.sales_per_point <= 0 {
            return Err(Error::Config(format!(
                "sales_per_point must be strictly positive, got {}",
                self.sales_per_point
            )));
        }
        if self.orders_per_point <= 0 {
            return Err(Error::Config(format!(
                "orders_per_point must be strictly positive, got {}",
                self.orders_per_point
            )));
        }
        for (name, value) in [
            ("weekly_consecutive_bonus", self.weekly_consecutive_bonus),
            ("monthly_consecutive_bonus", self.monthly_consecutive_bonus),
            ("post_score", self.post_score),
            ("comment_score", self.comment_score),
            ("login_score", self.login_score),
        ] {
            if value < 0.0 {
                return Err(Error::Config(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            sales_per_point: 10_000,
            orders_per_point: 10,
            weekly_consecutive_bonus: 50.0,
            monthly_consecutive_bonus: 500.0,
            post_score: 5.0,
            comment_score: 2.0,
            login_score: 3.0,
        }
    }
}

/// Per-tier thresholds
///
/// `min_order_count` and `min_total_sales` gate performance-mode
/// classification (both must be met); `min_score` is the contribution-mode
/// breakpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCriterion {
    pub tier: Tier,
    pub min_order_count: i64,
    pub min_total_sales: i64,
    pub min_score: f64,
}

/// An organization owner's leaderboard opt-in and visibility flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationSetting {
    pub owner_user_id: Uuid,
    pub is_participating: bool,
    pub show_score: bool,
    pub show_sales_performance: bool,
}

/// Partial update to a participation setting
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipationUpdate {
    pub is_participating: Option<bool>,
    pub show_score: Option<bool>,
    pub show_sales_performance: Option<bool>,
}

impl ParticipationSetting {
    /// The lazy default: everything off, nothing persisted yet
    pub fn default_for(owner_user_id: Uuid) -> Self {
        Self {
            owner_user_id,
            is_participating: false,
            show_score: false,
            show_sales_performance: false,
        }
    }

    /// Merge an update, enforcing that a non-participant cannot keep
    /// partial visibility: turning participation off forces both visibility
    /// flags off in the same write.
    pub fn merged(&self, update: &ParticipationUpdate) -> Self {
        let mut next = Self {
            owner_user_id: self.owner_user_id,
            is_participating: update.is_participating.unwrap_or(self.is_participating),
            show_score: update.show_score.unwrap_or(self.show_score),
            show_sales_performance: update
                .show_sales_performance
                .unwrap_or(self.show_sales_performance),
        };
        if !next.is_participating {
            next.show_score = false;
            next.show_sales_performance = false;
        }
        next
    }
}

/// Snapshot cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "daily",
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
        }
    }
}

impl FromStr for PeriodType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(PeriodType::Daily),
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            other => Err(Error::Config(format!("unknown period type: {other}"))),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable leaderboard row for an organization and period
///
/// Identity is `(organization_id, period_type, period_start)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSnapshotEntry {
    pub organization_id: Uuid,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub rank: i32,
    pub total_score: f64,
    pub tier: Tier,
    pub total_sales: i64,
    pub order_count: i64,
    pub sales_points: f64,
    pub order_points: f64,
    pub activity_points: f64,
    pub prev_rank: Option<i32>,
    pub rank_change: i32,
    pub score_change: f64,
}

/// An awarded badge, unique per (organization, period month, badge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub organization_id: Uuid,
    pub period_month: NaiveDate,
    pub badge_id: String,
    pub awarded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_labels_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Light < Tier::Standard);
        assert!(Tier::Standard < Tier::Advance);
        assert!(Tier::Advance < Tier::Elite);
        assert!(Tier::Elite < Tier::Legend);
    }

    #[test]
    fn test_unknown_tier_label_rejected() {
        assert!("DIAMOND".parse::<Tier>().is_err());
        assert!("light".parse::<Tier>().is_err());
    }

    #[test]
    fn test_settings_reject_zero_divisors() {
        let mut settings = ScoreSettings::default();
        settings.sales_per_point = 0;
        assert!(settings.validate().is_err());

        let mut settings = ScoreSettings::default();
        settings.orders_per_point = -5;
        assert!(settings.validate().is_err());

        assert!(ScoreSettings::default().validate().is_ok());
    }

    #[test]
    fn test_opting_out_clears_visibility_flags() {
        let owner = Uuid::new_v4();
        let current = ParticipationSetting {
            owner_user_id: owner,
            is_participating: true,
            show_score: true,
            show_sales_performance: true,
        };

        let next = current.merged(&ParticipationUpdate {
            is_participating: Some(false),
            show_score: Some(true),
            show_sales_performance: None,
        });

        assert!(!next.is_participating);
        assert!(!next.show_score);
        assert!(!next.show_sales_performance);
    }

    #[test]
    fn test_visibility_kept_while_participating() {
        let owner = Uuid::new_v4();
        let current = ParticipationSetting {
            owner_user_id: owner,
            is_participating: true,
            show_score: false,
            show_sales_performance: true,
        };

        let next = current.merged(&ParticipationUpdate {
            show_score: Some(true),
            ..Default::default()
        });

        assert!(next.is_participating);
        assert!(next.show_score);
        assert!(next.show_sales_performance);
    }

    #[test]
    fn test_default_participation_is_all_false() {
        let setting = ParticipationSetting::default_for(Uuid::new_v4());
        assert!(!setting.is_participating);
        assert!(!setting.show_score);
        assert!(!setting.show_sales_performance);
    }
}
