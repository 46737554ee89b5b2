//! Seller ranking computation and orchestration
//!
//! Pure scoring and classification live in `scoring`, `classify`, `streak`
//! and `ranking`; the persisting operations (tier state machine, snapshot
//! builder, badge awarder, batch runner) compose them on top of the db crate.

pub mod activity;
pub mod badges;
pub mod batch;
pub mod classify;
pub mod events;
pub mod notify;
pub mod ranking;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;
pub mod streak;
pub mod tier_state;

#[cfg(test)]
mod classify_test;
#[cfg(test)]
mod ranking_test;
#[cfg(test)]
mod streak_test;

pub use batch::{run_monthly_batch, BatchSummary};
pub use events::{handle_event, ActivityEvent};
pub use notify::Notifier;
pub use scheduler::{ScheduleConfig, ScheduleService};
pub use tier_state::TierChange;

pub(crate) fn db_err(e: sqlx::Error) -> common::Error {
    common::Error::Database(e.to_string())
}
