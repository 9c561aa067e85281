//! Ad-hoc chair overrides on a table.

use tracing::info;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{CAPACITY_OVERRIDE_MAX, TableState};

/// Add one extra chair, up to [`CAPACITY_OVERRIDE_MAX`]. At the cap the
/// call is a no-op, not an error.
pub fn add_chair(
    storage: &FloorStorage,
    workspace_id: &str,
    table_number: u32,
    now: i64,
) -> ActionResult<TableState> {
    set_override(storage, workspace_id, table_number, now, |current| {
        (current + 1).min(CAPACITY_OVERRIDE_MAX)
    })
}

/// Remove one extra chair, down to zero. Never touches `base_capacity`.
pub fn remove_chair(
    storage: &FloorStorage,
    workspace_id: &str,
    table_number: u32,
    now: i64,
) -> ActionResult<TableState> {
    set_override(storage, workspace_id, table_number, now, |current| {
        current.saturating_sub(1)
    })
}

fn set_override(
    storage: &FloorStorage,
    workspace_id: &str,
    table_number: u32,
    now: i64,
    next: impl FnOnce(u32) -> u32,
) -> ActionResult<TableState> {
    let txn = storage.begin_write()?;
    let mut table = storage
        .get_table_txn(&txn, workspace_id, table_number)?
        .ok_or_else(|| ActionError::NotFound(format!("Table {table_number}")))?;

    table.capacity_override = next(table.capacity_override);
    table.updated_at = now;
    storage.put_table(&txn, workspace_id, &table)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        table_number,
        capacity_override = table.capacity_override,
        "Chair override updated"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Workspace;

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
    fn add_clamps_at_two_without_error() {
        let storage = setup();
        assert_eq!(add_chair(&storage, "w1", 1, 0).unwrap().capacity_override, 1);
        assert_eq!(add_chair(&storage, "w1", 1, 0).unwrap().capacity_override, 2);
        // At the cap: no-op
        let t = add_chair(&storage, "w1", 1, 0).unwrap();
        assert_eq!(t.capacity_override, 2);
        assert_eq!(t.effective_capacity(), 6);
    }

    #[test]
    fn remove_clamps_at_zero_and_keeps_base() {
        let storage = setup();
        let t = remove_chair(&storage, "w1", 1, 0).unwrap();
        assert_eq!(t.capacity_override, 0);
        assert_eq!(t.base_capacity, 4);

        add_chair(&storage, "w1", 1, 0).unwrap();
        let t = remove_chair(&storage, "w1", 1, 0).unwrap();
        assert_eq!(t.capacity_override, 0);
    }
}
