//! Rank assignment
//!
//! Ordering is descending by total score with ascending organization id as
//! the tie-break, so repeated builds over the same data produce identical
//! output. Ranks are dense: exactly equal scores share a rank and the next
//! distinct score takes the following value.

use std::cmp::Ordering;

use common::models::Tier;
use uuid::Uuid;

use crate::scoring::ScoreBreakdown;

/// One organization's computed score, ready for ranking
#[derive(Debug, Clone)]
pub struct ScoredOrganization {
    pub organization_id: Uuid,
    pub tier: Tier,
    pub total_sales: i64,
    pub order_count: i64,
    pub breakdown: ScoreBreakdown,
}

/// A scored organization with its assigned rank
#[derive(Debug, Clone)]
pub struct RankedOrganization {
    pub rank: i32,
    pub scored: ScoredOrganization,
}

/// Order and rank a set of scored organizations
pub fn assign_ranks(mut entries: Vec<ScoredOrganization>) -> Vec<RankedOrganization> {
    entries.sort_by(|a, b| {
        b.breakdown
            .total
            .partial_cmp(&a.breakdown.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.organization_id.cmp(&b.organization_id))
    });

    let mut ranked = Vec::with_capacity(entries.len());
    let mut rank = 0i32;
    let mut last_score: Option<f64> = None;

    for scored in entries {
        if last_score != Some(scored.breakdown.total) {
            rank += 1;
        }
        last_score = Some(scored.breakdown.total);
        ranked.push(RankedOrganization { rank, scored });
    }

    ranked
}
