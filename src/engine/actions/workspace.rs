//! Workspace lifecycle: create from a floor plan, reset, activate.

use tracing::info;
use uuid::Uuid;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{TableState, Workspace};

/// One table of the caller-supplied floor plan.
#[derive(Debug, Clone)]
pub struct NewWorkspaceTable {
    pub table_number: u32,
    pub seats: u32,
}

/// Create a workspace with its table population in one transaction.
pub fn create_workspace(
    storage: &FloorStorage,
    user_id: &str,
    name: &str,
    template_name: &str,
    tables: Vec<NewWorkspaceTable>,
    now: i64,
) -> ActionResult<Workspace> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ActionError::Validation("Workspace name is required".into()));
    }
    if tables.is_empty() {
        return Err(ActionError::Validation("A workspace needs at least one table".into()));
    }
    let mut numbers: Vec<u32> = tables.iter().map(|t| t.table_number).collect();
    numbers.sort_unstable();
    if numbers.windows(2).any(|w| w[0] == w[1]) {
        return Err(ActionError::Validation("Duplicate table numbers in floor plan".into()));
    }
    if tables.iter().any(|t| t.seats == 0) {
        return Err(ActionError::Validation("Every table needs at least one seat".into()));
    }

    let workspace = Workspace {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        template_name: template_name.to_string(),
        created_at: now,
        updated_at: now,
        is_active: false,
    };

    let txn = storage.begin_write()?;
    storage.put_workspace(&txn, &workspace)?;
    for t in &tables {
        storage.put_table(&txn, &workspace.id, &TableState::new(t.table_number, t.seats, now))?;
    }
    txn.commit()?;

    info!(
        workspace_id = %workspace.id,
        user_id = %user_id,
        tables = tables.len(),
        "Workspace created"
    );
    Ok(workspace)
}

/// Wipe a workspace back to the start of service: delete every party,
/// reset every table to FREE. Combos and seating history are untouched.
pub fn reset_workspace(storage: &FloorStorage, workspace_id: &str, now: i64) -> ActionResult<()> {
    let txn = storage.begin_write()?;
    if storage.get_workspace_txn(&txn, workspace_id)?.is_none() {
        return Err(ActionError::NotFound(format!("Workspace {workspace_id}")));
    }

    let deleted = storage.delete_parties_for_workspace(&txn, workspace_id)?;
    for mut table in storage.list_tables_txn(&txn, workspace_id)? {
        let in_combo = table.in_combo_id.take();
        table.reset_to_free(now);
        table.in_combo_id = in_combo;
        storage.put_table(&txn, workspace_id, &table)?;
    }
    txn.commit()?;

    info!(workspace_id = %workspace_id, parties_deleted = deleted, "Workspace reset");
    Ok(())
}

/// Make one workspace the user's active one; every other workspace of
/// the same user is deactivated in the same transaction.
pub fn set_active_workspace(
    storage: &FloorStorage,
    user_id: &str,
    workspace_id: &str,
    now: i64,
) -> ActionResult<Workspace> {
    let txn = storage.begin_write()?;
    let target = storage
        .get_workspace_txn(&txn, workspace_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Workspace {workspace_id}")))?;
    if target.user_id != user_id {
        return Err(ActionError::NotFound(format!("Workspace {workspace_id}")));
    }

    let mut activated = target;
    for mut ws in storage.list_workspaces_for_user_txn(&txn, user_id)? {
        ws.is_active = ws.id == workspace_id;
        ws.updated_at = now;
        if ws.id == workspace_id {
            activated = ws.clone();
        }
        storage.put_workspace(&txn, &ws)?;
    }
    txn.commit()?;

    info!(workspace_id = %workspace_id, user_id = %user_id, "Workspace activated");
    Ok(activated)
}
