//! Score aggregation

use common::models::{ActivityWindow, ScoreSettings, StreakUnit};
use common::Result;

/// Itemized result of one score computation
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScoreBreakdown {
    pub sales_points: f64,
    pub order_points: f64,
    pub streak_bonus: f64,
    pub post_points: f64,
    pub comment_points: f64,
    pub login_points: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Everything that is not sales or orders, matching the stored
    /// activity_points column
    pub fn activity_points(&self) -> f64 {
        self.streak_bonus + self.post_points + self.comment_points + self.login_points
    }
}

/// Compute the weighted score for one activity window
///
/// Pure function of its inputs; safe to call concurrently and repeatedly.
/// Fails only on invalid settings (zero or negative divisor weights).
pub fn compute_score(window: &ActivityWindow, settings: &ScoreSettings) -> Result<ScoreBreakdown> {
    settings.validate()?;

    let sales_points = window.total_sales as f64 / settings.sales_per_point as f64;
    let order_points = window.order_count as f64 / settings.orders_per_point as f64;

    // The window carries at most one streak, so the weekly and monthly
    // bonuses can never both apply to the same computation.
    let streak_bonus = match window.streak {
        Some(streak) if streak.length > 0 => match streak.unit {
            StreakUnit::Week => settings.weekly_consecutive_bonus,
            StreakUnit::Month => settings.monthly_consecutive_bonus,
        },
        _ => 0.0,
    };

    let post_points = settings.post_score * window.post_count as f64;
    let comment_points = settings.comment_score * window.comment_count as f64;
    let login_points = settings.login_score * window.login_days as f64;

    let total = sales_points
        + order_points
        + streak_bonus
        + post_points
        + comment_points
        + login_points;

    Ok(ScoreBreakdown {
        sales_points,
        order_points,
        streak_bonus,
        post_points,
        comment_points,
        login_points,
        total,
    })
}
