//! Seat a waiting party at a single table.

use tracing::info;
use uuid::Uuid;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{Party, PartyStatus, SeatingRecord, TableState, TableStatus};
use crate::engine::wait::estimated_meal_duration_min;
use crate::utils::time::minutes_to_millis;

/// Seat a WAITING party at a FREE or TURNING table.
///
/// One transaction covers the party, the table, and the new open seating
/// record, so a concurrent seat attempt on the same table sees either all
/// of it or none of it.
pub fn seat_party_at_table(
    storage: &FloorStorage,
    workspace_id: &str,
    party_id: &str,
    table_number: u32,
    now: i64,
) -> ActionResult<(Party, TableState)> {
    let txn = storage.begin_write()?;

    let mut party = storage
        .get_party_txn(&txn, workspace_id, party_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Party {party_id}")))?;
    if party.status != PartyStatus::Waiting {
        return Err(ActionError::PartyNotWaiting);
    }

    let mut table = storage
        .get_table_txn(&txn, workspace_id, table_number)?
        .ok_or_else(|| ActionError::NotFound(format!("Table {table_number}")))?;
    if table.in_combo_id.is_some() {
        return Err(ActionError::AlreadyInCombo(table_number));
    }
    if table.status == TableStatus::Occupied {
        return Err(ActionError::TableOccupied(table_number));
    }
    let capacity = table.effective_capacity();
    if capacity < party.size {
        return Err(ActionError::TableTooSmall {
            table_number,
            capacity,
            size: party.size,
        });
    }

    table.status = TableStatus::Occupied;
    table.last_seated_at = Some(now);
    table.expected_free_at = Some(now + minutes_to_millis(estimated_meal_duration_min(party.size)));
    table.current_party_id = Some(party.id.clone());
    table.current_party_name = Some(party.name.clone());
    table.updated_at = now;

    party.status = PartyStatus::Seated;
    party.seated_at = Some(now);

    let seating = SeatingRecord {
        id: Uuid::new_v4().to_string(),
        party_id: party.id.clone(),
        table_number,
        seated_at: now,
        cleared_at: None,
        duration_min: None,
    };

    storage.put_table(&txn, workspace_id, &table)?;
    storage.put_party(&txn, workspace_id, &party)?;
    storage.put_seating(&txn, workspace_id, &seating)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        party_id = %party_id,
        table_number,
        size = party.size,
        "Party seated"
    );
    Ok((party, table))
}
