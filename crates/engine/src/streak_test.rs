#[cfg(test)]
mod tests {
    use crate::streak::*;
    use chrono::{Duration, NaiveDate};
    use common::models::StreakUnit;
    use common::period::is_saturday;
    use std::collections::BTreeSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Every non-Saturday day in `[start, end]`
    fn fill(days: &mut BTreeSet<NaiveDate>, start: NaiveDate, end: NaiveDate) {
        let mut day = start;
        while day <= end {
            if !is_saturday(day) {
                days.insert(day);
            }
            day += Duration::days(1);
        }
    }

    // 2026-03-01 is a Sunday, 2026-03-14 a Saturday

    #[test]
    fn test_no_activity_no_streak() {
        assert_eq!(detect_streak(&BTreeSet::new(), d(2026, 3, 14)), None);
    }

    #[test]
    fn test_one_full_week_counts() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 3, 8), d(2026, 3, 13)); // Sun..Fri

        let streak = detect_streak(&days, d(2026, 3, 14)).unwrap();
        assert_eq!(streak.unit, StreakUnit::Week);
        assert_eq!(streak.length, 1);
    }

    #[test]
    fn test_consecutive_weeks_accumulate() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 3, 1), d(2026, 3, 13)); // two Sun..Fri blocks

        let streak = detect_streak(&days, d(2026, 3, 14)).unwrap();
        assert_eq!(streak.unit, StreakUnit::Week);
        assert_eq!(streak.length, 2);
    }

    #[test]
    fn test_missed_weekday_breaks_the_week() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 3, 8), d(2026, 3, 13));
        days.remove(&d(2026, 3, 11)); // Wednesday off

        assert_eq!(detect_streak(&days, d(2026, 3, 14)), None);
    }

    #[test]
    fn test_incomplete_block_not_counted_early() {
        // As of Friday the current Sun..Fri block is not finished yet, so
        // only the prior week can count
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 3, 8), d(2026, 3, 12));

        assert_eq!(detect_streak(&days, d(2026, 3, 13)), None);
    }

    #[test]
    fn test_full_month_counts_without_saturdays() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 2, 1), d(2026, 2, 28));

        let streak = detect_streak(&days, d(2026, 3, 10)).unwrap();
        assert_eq!(streak.unit, StreakUnit::Month);
        assert_eq!(streak.length, 1);
    }

    #[test]
    fn test_consecutive_months_accumulate() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 1, 1), d(2026, 2, 28));

        let streak = detect_streak(&days, d(2026, 3, 1)).unwrap();
        assert_eq!(streak.unit, StreakUnit::Month);
        assert_eq!(streak.length, 2);
    }

    #[test]
    fn test_month_streak_dominates_week_streak() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 2, 1), d(2026, 2, 28));
        fill(&mut days, d(2026, 3, 1), d(2026, 3, 13));

        let streak = detect_streak(&days, d(2026, 3, 14)).unwrap();
        assert_eq!(streak.unit, StreakUnit::Month);
    }

    #[test]
    fn test_single_missed_day_breaks_the_month() {
        let mut days = BTreeSet::new();
        fill(&mut days, d(2026, 2, 1), d(2026, 2, 28));
        days.remove(&d(2026, 2, 16)); // a Monday

        // Falls back to the weeks after the gap: only Feb 22..27 qualifies
        let streak = detect_streak(&days, d(2026, 3, 1)).unwrap();
        assert_eq!(streak.unit, StreakUnit::Week);
        assert_eq!(streak.length, 1);
    }
}
