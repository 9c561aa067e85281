//! Clear a table back to FREE and close its seating record.

use tracing::info;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::TableState;
use crate::utils::time::minutes_between;

/// Clear a table: close the latest open seating record with the actual
/// sit duration, then reset every occupancy field.
///
/// Idempotent on an already-free table; there is simply no open record
/// to close and the reset is a no-op.
pub fn clear_table(
    storage: &FloorStorage,
    workspace_id: &str,
    table_number: u32,
    now: i64,
) -> ActionResult<TableState> {
    let txn = storage.begin_write()?;
    let mut table = storage
        .get_table_txn(&txn, workspace_id, table_number)?
        .ok_or_else(|| ActionError::NotFound(format!("Table {table_number}")))?;

    if let Some(mut seating) = storage.latest_open_seating_txn(&txn, workspace_id, table_number)? {
        seating.cleared_at = Some(now);
        seating.duration_min = Some(minutes_between(seating.seated_at, now).max(0));
        storage.put_seating(&txn, workspace_id, &seating)?;
    }

    table.reset_to_free(now);
    storage.put_table(&txn, workspace_id, &table)?;
    txn.commit()?;

    info!(workspace_id = %workspace_id, table_number, "Table cleared");
    Ok(table)
}
