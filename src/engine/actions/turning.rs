//! Mark a table as turning (being cleared and reset for the next party).

use tracing::info;

use super::add_minutes::MAX_EXTEND_MIN;
use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{TableState, TableStatus};
use crate::utils::time::minutes_to_millis;

/// Default turning window in minutes.
pub const DEFAULT_TURNING_MIN: i64 = 15;

/// Transition a table to TURNING.
///
/// From FREE this means "preparing an empty table" and drops any stale
/// party association; from OCCUPIED the guests are leaving, so the party
/// link stays for display. Either way the window is added on top of
/// `max(now, expected_free_at)`, so repeated calls only push the estimate
/// forward.
pub fn mark_table_turning(
    storage: &FloorStorage,
    workspace_id: &str,
    table_number: u32,
    minutes: Option<i64>,
    now: i64,
) -> ActionResult<TableState> {
    let minutes = minutes.unwrap_or(DEFAULT_TURNING_MIN);
    if minutes <= 0 || minutes > MAX_EXTEND_MIN {
        return Err(ActionError::Validation(format!(
            "Turning minutes must be between 1 and {MAX_EXTEND_MIN}"
        )));
    }

    let txn = storage.begin_write()?;
    let mut table = storage
        .get_table_txn(&txn, workspace_id, table_number)?
        .ok_or_else(|| ActionError::NotFound(format!("Table {table_number}")))?;
    if table.in_combo_id.is_some() {
        return Err(ActionError::AlreadyInCombo(table_number));
    }

    let base = table.expected_free_at.filter(|&t| t > now).unwrap_or(now);
    let expected_free_at = base + minutes_to_millis(minutes);

    if table.status == TableStatus::Free {
        table.last_seated_at = None;
        table.current_party_id = None;
        table.current_party_name = None;
    }
    table.status = TableStatus::Turning;
    table.expected_free_at = Some(expected_free_at);
    table.updated_at = now;

    storage.put_table(&txn, workspace_id, &table)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        table_number,
        minutes,
        "Table marked turning"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Workspace;
    use crate::utils::time::MILLIS_PER_MINUTE as MIN;

    fn setup() -> FloorStorage {
        let storage = FloorStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .put_workspace(
                &txn,
                &Workspace {
                    id: "w1".into(),
                    user_id: "u1".into(),
                    name: "dinner".into(),
                    created_at: 0,
                    ..Default::default()
                },
            )
            .unwrap();
        storage.put_table(&txn, "w1", &TableState::new(1, 4, 0)).unwrap();
        txn.commit().unwrap();
        storage
    }

    #[test]
    fn free_table_gets_default_window() {
        let storage = setup();
        let now = 1_000_000;
        let t = mark_table_turning(&storage, "w1", 1, None, now).unwrap();
        assert_eq!(t.status, TableStatus::Turning);
        assert_eq!(t.expected_free_at, Some(now + DEFAULT_TURNING_MIN * MIN));
        assert!(t.current_party_id.is_none());
    }

    #[test]
    fn occupied_table_keeps_party_and_extends_estimate() {
        let storage = setup();
        let now = 1_000_000;

        let txn = storage.begin_write().unwrap();
        let mut t = storage.get_table_txn(&txn, "w1", 1).unwrap().unwrap();
        t.status = TableStatus::Occupied;
        t.current_party_name = Some("Dubois".into());
        t.expected_free_at = Some(now + 20 * MIN);
        storage.put_table(&txn, "w1", &t).unwrap();
        txn.commit().unwrap();

        let t = mark_table_turning(&storage, "w1", 1, Some(5), now).unwrap();
        assert_eq!(t.status, TableStatus::Turning);
        assert_eq!(t.current_party_name.as_deref(), Some("Dubois"));
        // Window stacks on the future estimate, never shortens it
        assert_eq!(t.expected_free_at, Some(now + 25 * MIN));
    }

    #[test]
    fn stale_estimate_rebases_on_now() {
        let storage = setup();
        let now = 1_000_000;

        let txn = storage.begin_write().unwrap();
        let mut t = storage.get_table_txn(&txn, "w1", 1).unwrap().unwrap();
        t.status = TableStatus::Occupied;
        t.expected_free_at = Some(now - 30 * MIN);
        storage.put_table(&txn, "w1", &t).unwrap();
        txn.commit().unwrap();

        let t = mark_table_turning(&storage, "w1", 1, Some(10), now).unwrap();
        assert_eq!(t.expected_free_at, Some(now + 10 * MIN));
    }

    #[test]
    fn oversized_turning_window_is_rejected() {
        let storage = setup();
        assert!(matches!(
            mark_table_turning(&storage, "w1", 1, Some(MAX_EXTEND_MIN + 1), 0),
            Err(ActionError::Validation(_))
        ));
        let t = storage.list_tables("w1").unwrap().remove(0);
        assert_eq!(t.status, TableStatus::Free);
        assert_eq!(t.expected_free_at, None);
    }

    #[test]
    fn combo_member_cannot_turn() {
        let storage = setup();
        let txn = storage.begin_write().unwrap();
        let mut t = storage.get_table_txn(&txn, "w1", 1).unwrap().unwrap();
        t.in_combo_id = Some("combo-1".into());
        storage.put_table(&txn, "w1", &t).unwrap();
        txn.commit().unwrap();

        assert!(matches!(
            mark_table_turning(&storage, "w1", 1, None, 0),
            Err(ActionError::AlreadyInCombo(1))
        ));
    }
}
