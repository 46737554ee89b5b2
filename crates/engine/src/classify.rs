//! Tier classification
//!
//! Both modes are total functions: any valid non-negative input maps to
//! exactly one of the five tiers, falling through to the lowest.

use common::models::{ActivityWindow, Tier, TierCriterion};

fn highest_first(criteria: &[TierCriterion]) -> Vec<&TierCriterion> {
    let mut sorted: Vec<&TierCriterion> = criteria.iter().collect();
    sorted.sort_by(|a, b| b.tier.cmp(&a.tier));
    sorted
}

/// Performance mode: the highest tier whose order count AND total sales
/// thresholds are both met over the rolling window
pub fn classify_by_performance(window: &ActivityWindow, criteria: &[TierCriterion]) -> Tier {
    for criterion in highest_first(criteria) {
        if window.order_count >= criterion.min_order_count
            && window.total_sales >= criterion.min_total_sales
        {
            return criterion.tier;
        }
    }
    Tier::Light
}

/// Contribution mode: the highest tier whose score breakpoint the weighted
/// score meets
pub fn classify_by_score(score: f64, criteria: &[TierCriterion]) -> Tier {
    for criterion in highest_first(criteria) {
        if score >= criterion.min_score {
            return criterion.tier;
        }
    }
    Tier::Light
}
