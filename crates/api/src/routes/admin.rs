//! Administrator routes: manual tiers, configuration, batch triggers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use common::models::{Organization, PeriodType, ScoreSettings, Tier, TierCriterion};
use common::period::{rolling_window, Period};
use engine::BatchSummary;

#[derive(Deserialize)]
pub struct SetTierRequest {
    /// One of the five tier labels, or null to clear the override
    pub tier: Option<String>,
    pub admin_id: Uuid,
}

/// Set or clear a manual tier override
pub async fn set_tier(
    State(state): State<Arc<AppState>>,
    Path(organization_id): Path<Uuid>,
    Json(request): Json<SetTierRequest>,
) -> ApiResult<Json<Organization>> {
    let tier = match request.tier.as_deref() {
        Some(label) => Some(
            label
                .parse::<Tier>()
                .map_err(|e: common::Error| ApiError::InvalidInput(e.to_string()))?,
        ),
        None => None,
    };

    let org = engine::tier_state::set_manual_tier(
        &state.pool,
        organization_id,
        tier,
        request.admin_id,
        state.local_today(),
        state.config.rolling_window_months,
    )
    .await?;

    Ok(Json(org))
}

#[derive(Deserialize)]
pub struct RemoveTierQuery {
    pub admin_id: Option<Uuid>,
}

/// Remove a manual override, returning the organization to automatic
/// classification
pub async fn remove_tier(
    State(state): State<Arc<AppState>>,
    Path(organization_id): Path<Uuid>,
    Query(query): Query<RemoveTierQuery>,
) -> ApiResult<Json<Organization>> {
    let org = engine::tier_state::remove_manual_tier(
        &state.pool,
        organization_id,
        query.admin_id.unwrap_or(Uuid::nil()),
        state.local_today(),
        state.config.rolling_window_months,
    )
    .await?;

    Ok(Json(org))
}

/// Read the global score settings
pub async fn get_score_settings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ScoreSettings>> {
    let settings = db::settings::score_settings(&state.pool).await?;
    Ok(Json(settings))
}

/// Replace the global score settings; prospective only
pub async fn put_score_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<ScoreSettings>,
) -> ApiResult<Json<ScoreSettings>> {
    settings
        .validate()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let updated = db::settings::update_score_settings(&state.pool, &settings).await?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct TierCriterionInput {
    pub tier: String,
    pub min_order_count: i64,
    pub min_total_sales: i64,
    pub min_score: f64,
}

/// Read the tier criteria table
pub async fn get_tier_criteria(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TierCriterion>>> {
    let criteria = db::settings::tier_criteria(&state.pool).await?;
    Ok(Json(criteria))
}

/// Upsert tier criteria rows
pub async fn put_tier_criteria(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<TierCriterionInput>>,
) -> ApiResult<Json<Vec<TierCriterion>>> {
    for input in &inputs {
        let criterion = TierCriterion {
            tier: input
                .tier
                .parse()
                .map_err(|e: common::Error| ApiError::InvalidInput(e.to_string()))?,
            min_order_count: input.min_order_count,
            min_total_sales: input.min_total_sales,
            min_score: input.min_score,
        };
        if criterion.min_order_count < 0 || criterion.min_total_sales < 0 {
            return Err(ApiError::InvalidInput(format!(
                "thresholds for {} must be non-negative",
                criterion.tier
            )));
        }
        db::settings::upsert_tier_criterion(&state.pool, &criterion).await?;
    }

    let criteria = db::settings::tier_criteria(&state.pool).await?;
    Ok(Json(criteria))
}

/// Run the monthly performance reclassification across the fleet
pub async fn run_monthly_batch(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BatchSummary>> {
    info!("Monthly batch triggered via API");

    let (start, end) = rolling_window(state.local_today(), state.config.rolling_window_months);
    let summary = engine::run_monthly_batch(
        &state.pool,
        start,
        end,
        state.config.batch_concurrency,
    )
    .await?;

    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct BuildSnapshotRequest {
    pub period_type: String,
    /// Any date inside the target period; defaults to the most recently
    /// completed period
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub supersede: bool,
}

#[derive(Serialize)]
pub struct BuildSnapshotResponse {
    pub period: Period,
    pub entries: usize,
    pub badges_awarded: usize,
}

/// Build a ranking snapshot on demand
pub async fn build_snapshot(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BuildSnapshotRequest>,
) -> ApiResult<Json<BuildSnapshotResponse>> {
    let period_type: PeriodType = request
        .period_type
        .parse()
        .map_err(|e: common::Error| ApiError::InvalidInput(e.to_string()))?;

    let today = state.local_today();
    let period = match (period_type, request.date) {
        (PeriodType::Daily, Some(date)) => Period::daily(date),
        (PeriodType::Daily, None) => Period::daily(today - Duration::days(1)),
        (PeriodType::Weekly, Some(date)) => Period::weekly_containing(date),
        (PeriodType::Weekly, None) => Period::weekly_containing(today - Duration::days(1)),
        (PeriodType::Monthly, Some(date)) => Period::monthly_containing(date),
        (PeriodType::Monthly, None) => Period::previous_month_of(today),
    };

    let entries = engine::snapshot::build_snapshot(&state.pool, &period, request.supersede).await?;
    let badges = engine::badges::award_badges(&state.pool, &entries).await?;

    Ok(Json(BuildSnapshotResponse {
        period,
        entries: entries.len(),
        badges_awarded: badges.len(),
    }))
}
