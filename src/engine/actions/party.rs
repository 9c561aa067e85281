//! Waitlist actions: add a party, cancel / no-show it.

use tracing::info;
use uuid::Uuid;

use super::{ActionError, ActionResult};
use crate::db::FloorStorage;
use crate::db::models::{Party, PartyStatus};
use crate::engine::wait::quoted_wait_minutes;

#[derive(Debug, Clone)]
pub struct NewParty {
    pub name: String,
    pub size: u32,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Add a party to the waitlist with a one-shot wait quote computed from
/// the table snapshot inside the same transaction. The quote is never
/// recomputed afterwards.
pub fn add_party(
    storage: &FloorStorage,
    workspace_id: &str,
    new_party: NewParty,
    now: i64,
) -> ActionResult<Party> {
    let name = new_party.name.trim();
    if name.is_empty() {
        return Err(ActionError::Validation("Party name is required".into()));
    }
    if new_party.size == 0 {
        return Err(ActionError::Validation("Party size must be at least 1".into()));
    }

    let txn = storage.begin_write()?;
    if storage.get_workspace_txn(&txn, workspace_id)?.is_none() {
        return Err(ActionError::NotFound(format!("Workspace {workspace_id}")));
    }

    let tables = storage.list_tables_txn(&txn, workspace_id)?;
    let quoted_wait_min = quoted_wait_minutes(new_party.size, &tables, now);

    let party = Party {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        size: new_party.size,
        phone: new_party.phone,
        notes: new_party.notes,
        status: PartyStatus::Waiting,
        created_at: now,
        seated_at: None,
        quoted_wait_min,
    };
    storage.put_party(&txn, workspace_id, &party)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        party_id = %party.id,
        size = party.size,
        quoted_wait_min,
        "Party added to waitlist"
    );
    Ok(party)
}

/// Move a WAITING party to CANCELED or NO_SHOW. Terminal states are
/// frozen, and SEATED is reachable only through the seating actions.
pub fn set_party_status(
    storage: &FloorStorage,
    workspace_id: &str,
    party_id: &str,
    status: PartyStatus,
    now: i64,
) -> ActionResult<Party> {
    if !matches!(status, PartyStatus::Canceled | PartyStatus::NoShow) {
        return Err(ActionError::Validation(
            "Status must be CANCELED or NO_SHOW".into(),
        ));
    }

    let txn = storage.begin_write()?;
    let mut party = storage
        .get_party_txn(&txn, workspace_id, party_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Party {party_id}")))?;
    if party.status != PartyStatus::Waiting {
        return Err(ActionError::PartyNotWaiting);
    }

    party.status = status;
    storage.put_party(&txn, workspace_id, &party)?;
    txn.commit()?;

    info!(
        workspace_id = %workspace_id,
        party_id = %party_id,
        status = ?status,
        at = now,
        "Party removed from waitlist"
    );
    Ok(party)
}
