//! Duration model and availability estimation.
//!
//! Pure functions over table snapshots; `now` is always passed in so the
//! estimates are deterministic under test.

use crate::db::models::{TableState, TableStatus};
use crate::utils::time::{MILLIS_PER_MINUTE, minutes_between};

/// Estimated meal duration in minutes for a party of the given size.
/// Step table tuned for a busy Saturday night (typical sit 1h45 to 2h).
pub fn estimated_meal_duration_min(size: u32) -> i64 {
    if size <= 2 {
        105
    } else if size <= 4 {
        110
    } else if size <= 6 {
        115
    } else {
        120
    }
}

/// Same step table keyed by table capacity, for when the party size is
/// unknown (display of an occupied table without a linked party).
pub fn estimated_meal_duration_by_capacity(capacity: u32) -> i64 {
    estimated_meal_duration_min(capacity)
}

/// Predicted instant at which a table could take a party of `size`.
///
/// A FREE table is available immediately. Otherwise trust the explicit
/// `expected_free_at` when staff set one; fall back to seating time plus
/// the estimated meal duration; with neither timestamp, assume a full
/// meal starting now.
pub fn predicted_available_at(table: &TableState, size: u32, now: i64) -> i64 {
    if table.status == TableStatus::Free {
        return now;
    }
    if let Some(expected) = table.expected_free_at {
        return expected;
    }
    if let Some(seated) = table.last_seated_at {
        return seated + estimated_meal_duration_min(size) * MILLIS_PER_MINUTE;
    }
    now + estimated_meal_duration_min(size) * MILLIS_PER_MINUTE
}

/// Display estimate for a table on the floor view, where there is no
/// prospective party in hand: the capacity-keyed duration stands in for
/// the unknown party size.
pub fn display_available_at(table: &TableState, now: i64) -> i64 {
    if table.status == TableStatus::Free {
        return now;
    }
    if let Some(expected) = table.expected_free_at {
        return expected;
    }
    let duration = estimated_meal_duration_by_capacity(table.effective_capacity());
    table.last_seated_at.unwrap_or(now) + duration * MILLIS_PER_MINUTE
}

/// Earliest predicted availability over every table with enough seats.
/// `None` when no table fits the party at all.
pub fn earliest_available_at(size: u32, tables: &[TableState], now: i64) -> Option<i64> {
    tables
        .iter()
        .filter(|t| t.effective_capacity() >= size)
        .map(|t| predicted_available_at(t, size, now))
        .min()
}

/// Whole-minute wait quote for a new party, clamped at zero.
///
/// When nothing fits the quote is also zero; eligibility is surfaced
/// separately by the suggest/assign endpoints rather than inflating the
/// quoted number.
pub fn quoted_wait_minutes(size: u32, tables: &[TableState], now: i64) -> i64 {
    match earliest_available_at(size, tables, now) {
        Some(earliest) => minutes_between(now, earliest).max(0),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::MILLIS_PER_MINUTE as MIN;

    fn table(number: u32, seats: u32) -> TableState {
        TableState::new(number, seats, 0)
    }

    #[test]
    fn duration_step_table() {
        assert_eq!(estimated_meal_duration_min(1), 105);
        assert_eq!(estimated_meal_duration_min(2), 105);
        assert_eq!(estimated_meal_duration_min(3), 110);
        assert_eq!(estimated_meal_duration_min(4), 110);
        assert_eq!(estimated_meal_duration_min(5), 115);
        assert_eq!(estimated_meal_duration_min(6), 115);
        assert_eq!(estimated_meal_duration_min(7), 120);
        assert_eq!(estimated_meal_duration_min(12), 120);
    }

    #[test]
    fn free_table_is_available_now() {
        let now = 1_000_000;
        let t = table(1, 4);
        assert_eq!(predicted_available_at(&t, 2, now), now);
        assert_eq!(quoted_wait_minutes(2, &[t], now), 0);
    }

    #[test]
    fn explicit_expected_free_at_wins() {
        let now = 1_000_000;
        let mut t = table(1, 4);
        t.status = TableStatus::Turning;
        t.last_seated_at = Some(now - 90 * MIN);
        t.expected_free_at = Some(now + 7 * MIN);
        assert_eq!(predicted_available_at(&t, 4, now), now + 7 * MIN);
    }

    #[test]
    fn occupied_table_projects_from_seating_time() {
        // Seated 30 minutes ago, party of 4 => free 110 - 30 = 80 min out
        let now = 10_000_000;
        let mut t = table(5, 4);
        t.status = TableStatus::Occupied;
        t.last_seated_at = Some(now - 30 * MIN);
        assert_eq!(predicted_available_at(&t, 4, now), now + 80 * MIN);
        assert_eq!(quoted_wait_minutes(4, std::slice::from_ref(&t), now), 80);
    }

    #[test]
    fn occupied_without_timestamps_assumes_full_meal() {
        let now = 500_000;
        let mut t = table(2, 2);
        t.status = TableStatus::Occupied;
        assert_eq!(predicted_available_at(&t, 2, now), now + 105 * MIN);
    }

    #[test]
    fn display_estimate_keys_on_effective_capacity() {
        let now = 1_000_000;
        let mut t = table(1, 6);
        t.status = TableStatus::Occupied;
        t.last_seated_at = Some(now - 40 * MIN);
        // Capacity 6 => 115-minute sit
        assert_eq!(display_available_at(&t, now), now + 75 * MIN);

        // Chair override bumps effective capacity to 8 => 120 minutes
        t.capacity_override = 2;
        assert_eq!(display_available_at(&t, now), now + 80 * MIN);

        // An explicit staff estimate always wins
        t.expected_free_at = Some(now + 3 * MIN);
        assert_eq!(display_available_at(&t, now), now + 3 * MIN);

        let free = table(2, 4);
        assert_eq!(display_available_at(&free, now), now);
    }

    #[test]
    fn earliest_filters_on_effective_capacity() {
        let now = 0;
        let small = table(1, 2);
        let mut boosted = table(2, 4);
        boosted.capacity_override = 2; // seats 6
        boosted.status = TableStatus::Occupied;
        boosted.expected_free_at = Some(now + 20 * MIN);

        // Party of 6 only fits the boosted table
        assert_eq!(earliest_available_at(6, &[small.clone(), boosted.clone()], now), Some(now + 20 * MIN));
        assert_eq!(quoted_wait_minutes(6, &[small, boosted], now), 20);
    }

    #[test]
    fn no_fitting_table_quotes_zero() {
        let now = 0;
        let tables = vec![table(1, 2), table(2, 4)];
        assert_eq!(earliest_available_at(10, &tables, now), None);
        assert_eq!(quoted_wait_minutes(10, &tables, now), 0);
    }

    #[test]
    fn quote_clamps_overdue_tables_to_zero() {
        let now = 10_000_000;
        let mut t = table(1, 4);
        t.status = TableStatus::Occupied;
        t.expected_free_at = Some(now - 5 * MIN);
        assert_eq!(quoted_wait_minutes(2, &[t], now), 0);
    }
}
