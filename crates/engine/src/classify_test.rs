#[cfg(test)]
mod tests {
    use crate::classify::*;
    use common::models::{ActivityWindow, Tier, TierCriterion};

    fn criteria() -> Vec<TierCriterion> {
        vec![
            TierCriterion {
                tier: Tier::Standard,
                min_order_count: 50,
                min_total_sales: 5_000_000,
                min_score: 1_200.0,
            },
            TierCriterion {
                tier: Tier::Advance,
                min_order_count: 150,
                min_total_sales: 15_000_000,
                min_score: 3_000.0,
            },
            TierCriterion {
                tier: Tier::Elite,
                min_order_count: 300,
                min_total_sales: 30_000_000,
                min_score: 6_000.0,
            },
            TierCriterion {
                tier: Tier::Legend,
                min_order_count: 100,
                min_total_sales: 5_000_000,
                min_score: 12_000.0,
            },
        ]
    }

    fn window(orders: i64, sales: i64) -> ActivityWindow {
        ActivityWindow {
            order_count: orders,
            total_sales: sales,
            ..Default::default()
        }
    }

    // Worked example: 120 orders exceeds the LEGEND order threshold but
    // 4,000,000 misses the sales threshold, so LEGEND must not be granted
    #[test]
    fn test_performance_requires_both_thresholds() {
        let legend_only = vec![TierCriterion {
            tier: Tier::Legend,
            min_order_count: 100,
            min_total_sales: 5_000_000,
            min_score: 12_000.0,
        }];

        assert_eq!(
            classify_by_performance(&window(120, 4_000_000), &legend_only),
            Tier::Light
        );
        assert_eq!(
            classify_by_performance(&window(120, 5_000_000), &legend_only),
            Tier::Legend
        );
    }

    #[test]
    fn test_performance_highest_satisfying_tier_wins() {
        // Meets STANDARD and ADVANCE but not ELITE
        assert_eq!(
            classify_by_performance(&window(200, 20_000_000), &criteria()),
            Tier::Advance
        );
    }

    #[test]
    fn test_performance_defaults_to_lowest() {
        assert_eq!(
            classify_by_performance(&window(0, 0), &criteria()),
            Tier::Light
        );
        assert_eq!(
            classify_by_performance(&window(49, 100_000_000), &criteria()),
            Tier::Light
        );
    }

    #[test]
    fn test_performance_thresholds_are_inclusive() {
        assert_eq!(
            classify_by_performance(&window(50, 5_000_000), &criteria()),
            Tier::Standard
        );
    }

    #[test]
    fn test_performance_ignores_input_order() {
        let mut reversed = criteria();
        reversed.reverse();
        assert_eq!(
            classify_by_performance(&window(200, 20_000_000), &reversed),
            Tier::Advance
        );
    }

    #[test]
    fn test_score_breakpoints() {
        let c = criteria();
        assert_eq!(classify_by_score(0.0, &c), Tier::Light);
        assert_eq!(classify_by_score(1_199.9, &c), Tier::Light);
        assert_eq!(classify_by_score(1_200.0, &c), Tier::Standard);
        assert_eq!(classify_by_score(5_000.0, &c), Tier::Advance);
        assert_eq!(classify_by_score(12_000.0, &c), Tier::Legend);
    }

    #[test]
    fn test_score_classification_total_over_samples() {
        let c = criteria();
        for score in [0.0, 0.5, 100.0, 1_200.0, 2_999.9, 6_000.0, 1e9] {
            let tier = classify_by_score(score, &c);
            assert!(Tier::ALL.contains(&tier));
        }
    }

    // Componentwise-larger input never yields a lower tier
    #[test]
    fn test_performance_monotonic() {
        let c = criteria();
        let samples = [
            (0, 0),
            (50, 5_000_000),
            (150, 15_000_000),
            (300, 30_000_000),
            (500, 50_000_000),
        ];
        for (i, &(o1, s1)) in samples.iter().enumerate() {
            for &(o2, s2) in &samples[i..] {
                let lower = classify_by_performance(&window(o1, s1), &c);
                let higher = classify_by_performance(&window(o2, s2), &c);
                assert!(higher >= lower);
            }
        }
    }

    #[test]
    fn test_empty_criteria_means_lowest() {
        assert_eq!(
            classify_by_performance(&window(1_000, 1_000_000_000), &[]),
            Tier::Light
        );
        assert_eq!(classify_by_score(1e12, &[]), Tier::Light);
    }
}
