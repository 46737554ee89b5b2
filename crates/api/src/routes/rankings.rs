//! Leaderboard routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, OptionExt};
use crate::state::AppState;
use common::models::{Badge, PeriodType, RankingSnapshotEntry, Tier};

#[derive(Deserialize)]
pub struct RankingQuery {
    /// Snapshot cadence: "daily", "weekly" or "monthly"
    #[serde(default = "default_period")]
    period: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_period() -> String {
    "monthly".to_string()
}

fn default_limit() -> i64 {
    50
}

fn parse_period(period: &str) -> ApiResult<PeriodType> {
    period
        .parse()
        .map_err(|e: common::Error| ApiError::InvalidInput(e.to_string()))
}

/// A snapshot entry with the owner's visibility masking applied
#[derive(Serialize)]
pub struct VisibleEntry {
    pub organization_id: Uuid,
    pub rank: i32,
    pub tier: Tier,
    pub rank_change: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count: Option<i64>,
}

#[derive(Serialize)]
pub struct RankingsResponse {
    pub entries: Vec<VisibleEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    pub period_type: PeriodType,
}

/// Top-N entries of the latest snapshot, participants only
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Json<RankingsResponse>> {
    let period_type = parse_period(&query.period)?;

    let Some(period_start) = db::snapshots::latest_period_start(&state.pool, period_type).await?
    else {
        return Ok(Json(RankingsResponse {
            entries: Vec::new(),
            period_start: None,
            period_type,
        }));
    };

    let entries =
        db::snapshots::entries_for_period(&state.pool, period_type, period_start, query.limit)
            .await?;

    let mut visible = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(masked) = mask_entry(&state, &entry).await? {
            visible.push(masked);
        }
    }

    Ok(Json(RankingsResponse {
        entries: visible,
        period_start: Some(period_start),
        period_type,
    }))
}

/// Apply the owner's visibility settings, dropping entries whose owner has
/// since opted out
async fn mask_entry(
    state: &AppState,
    entry: &RankingSnapshotEntry,
) -> ApiResult<Option<VisibleEntry>> {
    let Some(org) = db::organizations::get(&state.pool, entry.organization_id).await? else {
        return Ok(None);
    };
    let setting = db::participation::get(&state.pool, org.owner_user_id).await?;

    if !setting.is_participating {
        return Ok(None);
    }

    Ok(Some(VisibleEntry {
        organization_id: entry.organization_id,
        rank: entry.rank,
        tier: entry.tier,
        rank_change: entry.rank_change,
        total_score: setting.show_score.then_some(entry.total_score),
        total_sales: setting
            .show_sales_performance
            .then_some(entry.total_sales),
        order_count: setting
            .show_sales_performance
            .then_some(entry.order_count),
    }))
}

#[derive(Serialize)]
pub struct MyRankingResponse {
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<RankingSnapshotEntry>,
    pub badges: Vec<Badge>,
    pub participant_count: i64,
}

/// An organization's own latest entry with badges and participant context
pub async fn my_ranking(
    State(state): State<Arc<AppState>>,
    Path(organization_id): Path<Uuid>,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Json<MyRankingResponse>> {
    let period_type = parse_period(&query.period)?;

    let org = db::organizations::get(&state.pool, organization_id)
        .await?
        .not_found(format!("organization {organization_id}"))?;

    let setting = db::participation::get(&state.pool, org.owner_user_id).await?;
    let participant_count = db::participation::participant_count(&state.pool).await?;

    // A non-participant gets "no data", not an error
    if !setting.is_participating {
        return Ok(Json(MyRankingResponse {
            no_data: true,
            entry: None,
            badges: Vec::new(),
            participant_count,
        }));
    }

    let entry =
        db::snapshots::latest_entry_for_org(&state.pool, organization_id, period_type).await?;
    let badges = db::badges::list_for_organization(&state.pool, organization_id).await?;

    Ok(Json(MyRankingResponse {
        no_data: entry.is_none(),
        entry,
        badges,
        participant_count,
    }))
}
