//! Activity window assembly
//!
//! Joins the raw daily totals with streak detection into the
//! `ActivityWindow` the scorer and classifier consume. Organizations with no
//! recorded activity get zeroed fields, never an error.

use chrono::{Duration, NaiveDate};
use common::models::ActivityWindow;
use common::Result;
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::db_err;
use crate::streak;

/// How far back order days are fetched for streak detection
const STREAK_LOOKBACK_DAYS: i64 = 400;

/// Load one organization's activity over `[start, end)`
pub async fn load_window(
    pool: &PgPool,
    organization_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ActivityWindow> {
    let totals = db::activity::window_totals(pool, organization_id, start, end)
        .await
        .map_err(db_err)?;

    let lookback_start = end - Duration::days(STREAK_LOOKBACK_DAYS);
    let order_days = db::activity::active_order_days(pool, organization_id, lookback_start, end)
        .await
        .map_err(db_err)?;
    let order_days: BTreeSet<NaiveDate> = order_days.into_iter().collect();

    Ok(ActivityWindow {
        total_sales: totals.total_sales,
        order_count: totals.order_count,
        post_count: totals.post_count,
        comment_count: totals.comment_count,
        login_days: totals.login_days,
        streak: streak::detect_streak(&order_days, end),
    })
}
