//! Tests for guarded tier writes
//!
//! These tests document the concurrency contract of the tier columns.
//! Note: These are documentation tests that explain expected behavior.

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    /// Automatic results must never overwrite a manual override
    ///
    /// `update_tier_if_automatic` folds the mode check and the tier write
    /// into one statement:
    ///
    /// ```sql
    /// UPDATE organizations o
    /// SET current_tier = $2
    /// FROM (SELECT id, current_tier AS prev_tier FROM organizations
    ///       WHERE id = $1 FOR UPDATE) prev
    /// WHERE o.id = prev.id AND o.tier_mode = 'AUTOMATIC'
    /// RETURNING prev.prev_tier
    /// ```
    ///
    /// Race being guarded against: an activity event triggers an automatic
    /// reclassification while an admin sets a manual tier. With a
    /// read-then-write sequence the automatic writer could observe
    /// `AUTOMATIC`, lose the race, and then clobber the override. With the
    /// conditional statement the row lock plus the `tier_mode` predicate
    /// make the late automatic write a no-op (zero rows updated), which the
    /// engine reports as `TierChange::Overridden`.
    #[test]
    fn test_conditional_update_guards_manual_mode() {
        // The guard is the WHERE clause, not application code. A caller that
        // gets back None must not retry the write; the override wins.
        assert!(true);
    }

    /// The returned previous tier drives the three-way change result
    ///
    /// Callers need UPGRADED / DOWNGRADED / NO_CHANGE, not a boolean, so the
    /// statement returns the pre-update tier from the locked subquery. The
    /// engine compares it with the tier it just wrote:
    ///
    /// - prev < new  -> Upgraded { from, to }
    /// - prev > new  -> Downgraded { from, to }
    /// - prev == new -> Unchanged { tier }
    #[test]
    fn test_previous_tier_is_returned_for_direction() {
        // RETURNING prev.prev_tier reads from the pre-image captured under
        // FOR UPDATE, so the comparison is race-free.
        assert!(true);
    }
}
