//! Seat a waiting party at a merged combo.

use tracing::info;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{Combo, Party, PartyStatus, TableStatus};
use crate::engine::wait::estimated_meal_duration_min;
use crate::utils::time::minutes_to_millis;

/// Seat a WAITING party at a FREE or TURNING combo.
///
/// Occupancy lives on the combo record; member tables keep their
/// `in_combo_id` link and are untouched. Combo seatings do not open a
/// seating record, so they are invisible to the turn-time history.
pub fn seat_party_at_combo(
    storage: &FloorStorage,
    workspace_id: &str,
    party_id: &str,
    combo_id: &str,
    now: i64,
) -> ActionResult<(Party, Combo)> {
    let txn = storage.begin_write()?;

    let mut party = storage
        .get_party_txn(&txn, workspace_id, party_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Party {party_id}")))?;
    if party.status != PartyStatus::Waiting {
        return Err(ActionError::PartyNotWaiting);
    }

    let mut combo = storage
        .get_combo_txn(&txn, workspace_id, combo_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Combo {combo_id}")))?;
    if combo.status == TableStatus::Occupied {
        return Err(ActionError::ComboOccupied);
    }
    if combo.merged_capacity < party.size {
        return Err(ActionError::ComboTooSmall {
            capacity: combo.merged_capacity,
            size: party.size,
        });
    }

    combo.status = TableStatus::Occupied;
    combo.last_seated_at = Some(now);
    combo.expected_free_at = Some(now + minutes_to_millis(estimated_meal_duration_min(party.size)));
    combo.current_party_id = Some(party.id.clone());
    combo.current_party_name = Some(party.name.clone());
    combo.updated_at = now;

    party.status = PartyStatus::Seated;
    party.seated_at = Some(now);

    storage.put_combo(&txn, workspace_id, &combo)?;
    storage.put_party(&txn, workspace_id, &party)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        party_id = %party_id,
        combo_id = %combo_id,
        size = party.size,
        "Party seated at combo"
    );
    Ok((party, combo))
}
