//! Extend a table's expected-free estimate.

use tracing::info;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{TableState, TableStatus};
use crate::utils::time::minutes_to_millis;

/// Default single-table bump in minutes.
pub const BUMP_MINUTES: i64 = 10;

/// Minutes added to every running estimate when the kitchen falls behind.
pub const KITCHEN_SLOW_MIN: i64 = 10;

/// Largest single extension accepted, in minutes. Anything past a full
/// day is a typo, and unbounded input would overflow the millis math.
pub const MAX_EXTEND_MIN: i64 = 24 * 60;

/// Push a table's `expected_free_at` out by `minutes` (default 10).
///
/// Only meaningful while something is happening at the table; a FREE
/// table has no estimate to extend. The bump lands on top of
/// `max(now, expected_free_at)`, so the estimate never moves backwards.
pub fn add_minutes_to_table(
    storage: &FloorStorage,
    workspace_id: &str,
    table_number: u32,
    minutes: Option<i64>,
    now: i64,
) -> ActionResult<TableState> {
    let minutes = minutes.unwrap_or(BUMP_MINUTES);
    if minutes <= 0 || minutes > MAX_EXTEND_MIN {
        return Err(ActionError::Validation(format!(
            "Minutes must be between 1 and {MAX_EXTEND_MIN}"
        )));
    }

    let txn = storage.begin_write()?;
    let mut table = storage
        .get_table_txn(&txn, workspace_id, table_number)?
        .ok_or_else(|| ActionError::NotFound(format!("Table {table_number}")))?;
    if table.status == TableStatus::Free {
        return Err(ActionError::TableIsFree(table_number));
    }

    let base = table.expected_free_at.filter(|&t| t > now).unwrap_or(now);
    table.expected_free_at = Some(base + minutes_to_millis(minutes));
    table.updated_at = now;

    storage.put_table(&txn, workspace_id, &table)?;
    txn.commit()?;

    info!(workspace_id = %workspace_id, table_number, minutes, "Table estimate extended");
    Ok(table)
}

/// Kitchen is running slow: one atomic pass adding [`KITCHEN_SLOW_MIN`]
/// to every table that currently carries an estimate. Returns how many
/// tables were touched.
pub fn kitchen_running_slow(
    storage: &FloorStorage,
    workspace_id: &str,
    now: i64,
) -> ActionResult<usize> {
    let txn = storage.begin_write()?;
    let tables = storage.list_tables_txn(&txn, workspace_id)?;

    let mut touched = 0;
    for mut table in tables {
        if let Some(expected) = table.expected_free_at {
            table.expected_free_at = Some(expected + minutes_to_millis(KITCHEN_SLOW_MIN));
            table.updated_at = now;
            storage.put_table(&txn, workspace_id, &table)?;
            touched += 1;
        }
    }
    txn.commit()?;

    info!(workspace_id = %workspace_id, touched, "Kitchen slow: all estimates pushed back");
    Ok(touched)
}
