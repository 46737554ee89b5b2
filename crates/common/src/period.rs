//! Period boundary math
//!
//! All periods are half-open `[start, end)` over operator-local calendar
//! dates. Weeks start on Monday; the weekly/monthly streak rules live in the
//! engine, only the boundaries are computed here.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::PeriodType;

/// A snapshot period: cadence plus `[start, end)` date bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Period {
    pub period_type: PeriodType,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Single-day period
    pub fn daily(date: NaiveDate) -> Self {
        Self {
            period_type: PeriodType::Daily,
            start: date,
            end: date + Duration::days(1),
        }
    }

    /// Monday-start week containing `date`
    pub fn weekly_containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        let start = date - Duration::days(offset);
        Self {
            period_type: PeriodType::Weekly,
            start,
            end: start + Duration::days(7),
        }
    }

    /// Calendar month containing `date`
    pub fn monthly_containing(date: NaiveDate) -> Self {
        let start = month_start(date);
        Self {
            period_type: PeriodType::Monthly,
            start,
            end: add_months(start, 1),
        }
    }

    /// The full calendar month immediately before the one containing `date`
    pub fn previous_month_of(date: NaiveDate) -> Self {
        let this_month = month_start(date);
        Self {
            period_type: PeriodType::Monthly,
            start: add_months(this_month, -1),
            end: this_month,
        }
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists for a valid year/month
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Shift a date by whole months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + months;
    let year = zero_based.div_euclid(12);
    let month0 = zero_based.rem_euclid(12) as u32;
    let day = date.day();
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
        .or_else(|| {
            let next = NaiveDate::from_ymd_opt(
                (zero_based + 1).div_euclid(12),
                (zero_based + 1).rem_euclid(12) as u32 + 1,
                1,
            )?;
            next.pred_opt()
        })
        .unwrap_or(date)
}

/// Rolling performance window: `months` full calendar months plus the
/// month-to-date portion, ending the day after `today`
pub fn rolling_window(today: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let start = add_months(month_start(today), -(months as i32));
    (start, today + Duration::days(1))
}

/// Whether `date` is a Saturday (excluded from streak eligibility)
pub fn is_saturday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_daily_period_is_one_day() {
        let p = Period::daily(d(2026, 3, 15));
        assert_eq!(p.start, d(2026, 3, 15));
        assert_eq!(p.end, d(2026, 3, 16));
    }

    #[test]
    fn test_weekly_period_starts_monday() {
        // 2026-03-18 is a Wednesday
        let p = Period::weekly_containing(d(2026, 3, 18));
        assert_eq!(p.start, d(2026, 3, 16));
        assert_eq!(p.end, d(2026, 3, 23));

        // A Monday is its own week start
        let p = Period::weekly_containing(d(2026, 3, 16));
        assert_eq!(p.start, d(2026, 3, 16));
    }

    #[test]
    fn test_monthly_period_bounds() {
        let p = Period::monthly_containing(d(2026, 2, 14));
        assert_eq!(p.start, d(2026, 2, 1));
        assert_eq!(p.end, d(2026, 3, 1));
    }

    #[test]
    fn test_previous_month_crosses_year() {
        let p = Period::previous_month_of(d(2026, 1, 1));
        assert_eq!(p.start, d(2025, 12, 1));
        assert_eq!(p.end, d(2026, 1, 1));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2026, 1, 31), 1), d(2026, 2, 28));
        assert_eq!(add_months(d(2026, 3, 31), -1), d(2026, 2, 28));
        assert_eq!(add_months(d(2026, 5, 15), 3), d(2026, 8, 15));
    }

    #[test]
    fn test_rolling_window_covers_full_months_plus_to_date() {
        let (start, end) = rolling_window(d(2026, 4, 10), 3);
        assert_eq!(start, d(2026, 1, 1));
        assert_eq!(end, d(2026, 4, 11));
    }
}
