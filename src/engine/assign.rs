//! Assignment policy: who gets seated next, and where.
//!
//! Party selection is strictly FCFS (oldest WAITING by `created_at`).
//! Table selection picks the eligible table with the minimum predicted
//! availability. Within [`AUTO_SEAT_THRESHOLD_MIN`] the seating transition
//! fires immediately; beyond it the caller gets a recommendation they can
//! confirm with an explicit seat request.

use serde::Serialize;
use tracing::info;

use crate::db::FloorStorage;
use crate::db::models::{PartyStatus, TableState};
use crate::engine::actions::{ActionError, ActionResult, seat_party_at_table};
use crate::engine::wait::predicted_available_at;
use crate::utils::time::minutes_between;

/// Auto-seat when the best table frees up within this many minutes.
pub const AUTO_SEAT_THRESHOLD_MIN: i64 = 5;

/// Best-fit table for one party: minimum predicted availability among
/// tables that fit and are not merged into a combo.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSuggestion {
    pub table_number: u32,
    pub available_at: i64,
    pub minutes_until_available: i64,
}

pub fn suggest_table_for(size: u32, tables: &[TableState], now: i64) -> Option<TableSuggestion> {
    let mut best: Option<(u32, i64)> = None;
    for table in tables {
        if table.effective_capacity() < size || table.in_combo_id.is_some() {
            continue;
        }
        let at = predicted_available_at(table, size, now);
        // Ties go to the lowest table number
        if best.is_none_or(|(num, best_at)| at < best_at || (at == best_at && table.table_number < num)) {
            best = Some((table.table_number, at));
        }
    }
    best.map(|(table_number, available_at)| TableSuggestion {
        table_number,
        available_at,
        minutes_until_available: minutes_between(now, available_at).max(0),
    })
}

/// Outcome of one auto-assign or suggest pass.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum AssignOutcome {
    NoParty,
    NoTable {
        party_id: String,
        party_name: String,
        party_size: u32,
    },
    Recommendation {
        party_id: String,
        party_name: String,
        party_size: u32,
        table_number: u32,
        minutes_until_available: i64,
    },
    Seated {
        party_id: String,
        party_name: String,
        party_size: u32,
        table_number: u32,
        minutes_until_available: i64,
    },
}

/// One auto-assign pass for a workspace.
///
/// Picks the oldest WAITING party, finds its best-fit table, and seats it
/// on the spot when the table frees up within the threshold. The seating
/// transition re-validates everything inside its own transaction, so a
/// table that is still occupied at seat time surfaces as a conflict
/// rather than a double booking.
pub fn auto_assign_next(
    storage: &FloorStorage,
    workspace_id: &str,
    now: i64,
) -> ActionResult<AssignOutcome> {
    let Some(party) = storage
        .list_parties(workspace_id)?
        .into_iter()
        .find(|p| p.status == PartyStatus::Waiting)
    else {
        return Ok(AssignOutcome::NoParty);
    };

    let tables = storage.list_tables(workspace_id)?;
    let Some(suggestion) = suggest_table_for(party.size, &tables, now) else {
        return Ok(AssignOutcome::NoTable {
            party_id: party.id,
            party_name: party.name,
            party_size: party.size,
        });
    };

    if suggestion.minutes_until_available > AUTO_SEAT_THRESHOLD_MIN {
        return Ok(AssignOutcome::Recommendation {
            party_id: party.id,
            party_name: party.name,
            party_size: party.size,
            table_number: suggestion.table_number,
            minutes_until_available: suggestion.minutes_until_available,
        });
    }

    seat_party_at_table(storage, workspace_id, &party.id, suggestion.table_number, now)?;
    info!(
        workspace_id = %workspace_id,
        party_id = %party.id,
        table_number = suggestion.table_number,
        "Auto-seated next party"
    );
    Ok(AssignOutcome::Seated {
        party_id: party.id,
        party_name: party.name,
        party_size: party.size,
        table_number: suggestion.table_number,
        minutes_until_available: suggestion.minutes_until_available,
    })
}

/// Recommendation for one specific party; never auto-seats.
pub fn suggest_for_party(
    storage: &FloorStorage,
    workspace_id: &str,
    party_id: &str,
    now: i64,
) -> ActionResult<AssignOutcome> {
    let party = storage
        .get_party(workspace_id, party_id)?
        .ok_or_else(|| ActionError::NotFound(format!("Party {party_id}")))?;
    if party.status != PartyStatus::Waiting {
        return Err(ActionError::PartyNotWaiting);
    }

    let tables = storage.list_tables(workspace_id)?;
    match suggest_table_for(party.size, &tables, now) {
        Some(suggestion) => Ok(AssignOutcome::Recommendation {
            party_id: party.id,
            party_name: party.name,
            party_size: party.size,
            table_number: suggestion.table_number,
            minutes_until_available: suggestion.minutes_until_available,
        }),
        None => Ok(AssignOutcome::NoTable {
            party_id: party.id,
            party_name: party.name,
            party_size: party.size,
        }),
    }
}
