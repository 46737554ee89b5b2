//! Activity event handling
//!
//! Each qualifying event bumps the organization's daily counters and runs a
//! contribution-mode reclassification over the current calendar month.

use chrono::{Duration, NaiveDate};
use common::period::month_start;
use common::Result;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::db_err;
use crate::notify::Notifier;
use crate::tier_state::{self, TierChange};

/// A qualifying activity event from the commerce platform
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    /// An order left the warehouse; sales are counted at shipment
    OrderShipped { amount: i64 },
    PostCreated,
    CommentCreated,
    Login,
}

impl ActivityEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityEvent::OrderShipped { .. } => "order_shipped",
            ActivityEvent::PostCreated => "post_created",
            ActivityEvent::CommentCreated => "comment_created",
            ActivityEvent::Login => "login",
        }
    }
}

/// Record one event and reclassify the affected organization
pub async fn handle_event(
    pool: &PgPool,
    notifier: &Notifier,
    organization_id: Uuid,
    event: ActivityEvent,
    today: NaiveDate,
) -> Result<TierChange> {
    debug!(
        "Activity event {} for organization {}",
        event.kind(),
        organization_id
    );

    match event {
        ActivityEvent::OrderShipped { amount } => {
            db::activity::record_order_shipped(pool, organization_id, today, amount).await
        }
        ActivityEvent::PostCreated => db::activity::record_post(pool, organization_id, today).await,
        ActivityEvent::CommentCreated => {
            db::activity::record_comment(pool, organization_id, today).await
        }
        ActivityEvent::Login => db::activity::record_login(pool, organization_id, today).await,
    }
    .map_err(db_err)?;

    let settings = db::settings::score_settings(pool).await.map_err(db_err)?;
    let criteria = db::settings::tier_criteria(pool).await.map_err(db_err)?;

    let change = tier_state::reclassify_contribution(
        pool,
        organization_id,
        &settings,
        &criteria,
        month_start(today),
        today + Duration::days(1),
    )
    .await?;

    notifier.tier_changed(organization_id, &change).await;

    Ok(change)
}
