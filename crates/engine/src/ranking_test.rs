#[cfg(test)]
mod tests {
    use crate::ranking::*;
    use crate::scoring::ScoreBreakdown;
    use common::models::Tier;
    use uuid::Uuid;

    fn breakdown(total: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            sales_points: total,
            order_points: 0.0,
            streak_bonus: 0.0,
            post_points: 0.0,
            comment_points: 0.0,
            login_points: 0.0,
            total,
        }
    }

    fn scored(id: Uuid, total: f64) -> ScoredOrganization {
        ScoredOrganization {
            organization_id: id,
            tier: Tier::Light,
            total_sales: 0,
            order_count: 0,
            breakdown: breakdown(total),
        }
    }

    #[test]
    fn test_orders_descending_by_score() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        // Worked example: A scores 91, B scores 141 -> B rank 1, A rank 2
        let ranked = assign_ranks(vec![scored(a, 91.0), scored(b, 141.0)]);

        assert_eq!(ranked[0].scored.organization_id, b);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].scored.organization_id, a);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_equal_scores_share_a_dense_rank() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

        let ranked = assign_ranks(vec![
            scored(ids[0], 100.0),
            scored(ids[1], 50.0),
            scored(ids[2], 50.0),
            scored(ids[3], 10.0),
        ]);

        let ranks: Vec<i32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 3]);
    }

    #[test]
    fn test_ties_break_by_ascending_organization_id() {
        let mut ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();

        // Feed them in reverse to prove the sort does the work
        let ranked = assign_ranks(vec![
            scored(ids[2], 77.0),
            scored(ids[1], 77.0),
            scored(ids[0], 77.0),
        ]);

        let order: Vec<Uuid> = ranked.iter().map(|r| r.scored.organization_id).collect();
        assert_eq!(order, ids.to_vec());
        assert!(ranked.iter().all(|r| r.rank == 1));
    }

    #[test]
    fn test_deterministic_across_input_permutations() {
        let mut ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();
        let entries = vec![scored(ids[0], 5.0), scored(ids[1], 5.0), scored(ids[2], 9.0)];

        let mut reversed = entries.clone();
        reversed.reverse();

        let first: Vec<(Uuid, i32)> = assign_ranks(entries)
            .into_iter()
            .map(|r| (r.scored.organization_id, r.rank))
            .collect();
        let second: Vec<(Uuid, i32)> = assign_ranks(reversed)
            .into_iter()
            .map(|r| (r.scored.organization_id, r.rank))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_score_entries_are_kept() {
        let a = Uuid::new_v4();
        let ranked = assign_ranks(vec![scored(a, 0.0)]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].scored.breakdown.total, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(assign_ranks(Vec::new()).is_empty());
    }
}
