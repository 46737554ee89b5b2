//! Consecutive-activity streak detection
//!
//! A week counts when all six Sunday..Friday days had orders; a month counts
//! when every non-Saturday day had orders. Saturdays are excluded because
//! the platform does not ship on Saturdays. A monthly streak dominates a
//! weekly one, so a window never carries both bonuses.

use chrono::{Datelike, Duration, NaiveDate};
use common::models::{ActivityStreak, StreakUnit};
use common::period::{add_months, is_saturday, month_start};
use std::collections::BTreeSet;

// Backstops against unbounded scans over pathological data
const MAX_MONTHS: u32 = 120;
const MAX_WEEKS: u32 = 520;

fn month_fully_active(active_days: &BTreeSet<NaiveDate>, start: NaiveDate) -> bool {
    let end = add_months(start, 1);
    let mut day = start;
    while day < end {
        if !is_saturday(day) && !active_days.contains(&day) {
            return false;
        }
        day += Duration::days(1);
    }
    true
}

fn week_fully_active(active_days: &BTreeSet<NaiveDate>, sunday: NaiveDate) -> bool {
    (0..6).all(|i| active_days.contains(&(sunday + Duration::days(i))))
}

/// Detect the streak ending immediately before `as_of`
///
/// `as_of` is the exclusive end of the activity window; only fully completed
/// weeks/months before it are counted.
pub fn detect_streak(active_days: &BTreeSet<NaiveDate>, as_of: NaiveDate) -> Option<ActivityStreak> {
    // Months first: count backwards from the last completed calendar month
    let mut cursor = add_months(month_start(as_of), -1);
    let mut months = 0u32;
    while months < MAX_MONTHS && month_fully_active(active_days, cursor) {
        months += 1;
        cursor = add_months(cursor, -1);
    }
    if months > 0 {
        return Some(ActivityStreak {
            unit: StreakUnit::Month,
            length: months,
        });
    }

    // Weeks: most recent Sunday..Friday block fully before as_of
    let mut sunday = as_of - Duration::days(as_of.weekday().num_days_from_sunday() as i64);
    if sunday + Duration::days(5) >= as_of {
        sunday -= Duration::days(7);
    }
    let mut weeks = 0u32;
    while weeks < MAX_WEEKS && week_fully_active(active_days, sunday) {
        weeks += 1;
        sunday -= Duration::days(7);
    }
    if weeks > 0 {
        return Some(ActivityStreak {
            unit: StreakUnit::Week,
            length: weeks,
        });
    }

    None
}
