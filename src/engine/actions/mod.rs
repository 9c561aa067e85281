//! Transactional state machine over the record store.
//!
//! Every action runs inside a single write transaction: read current
//! state, validate preconditions, write all affected records, commit. A
//! precondition failure returns before the commit, the transaction drops,
//! and nothing changes.

mod add_minutes;
mod chairs;
mod clear_table;
mod combos;
mod party;
mod seat_combo;
mod seat_party;
mod turning;
mod workspace;

pub use add_minutes::{
    BUMP_MINUTES, KITCHEN_SLOW_MIN, MAX_EXTEND_MIN, add_minutes_to_table, kitchen_running_slow,
};
pub use chairs::{add_chair, remove_chair};
pub use clear_table::clear_table;
pub use combos::{create_combo, delete_combo};
pub use party::{NewParty, add_party, set_party_status};
pub use seat_combo::seat_party_at_combo;
pub use seat_party::seat_party_at_table;
pub use turning::{DEFAULT_TURNING_MIN, mark_table_turning};
pub use workspace::{NewWorkspaceTable, create_workspace, reset_workspace, set_active_workspace};

use thiserror::Error;

use crate::db::StorageError;

/// Closed set of reasons an action can refuse to run.
///
/// Rendered to human-readable text only at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Party is no longer waiting")]
    PartyNotWaiting,

    #[error("Table {table_number} seats {capacity}, party of {size} does not fit")]
    TableTooSmall {
        table_number: u32,
        capacity: u32,
        size: u32,
    },

    #[error("Combo seats {capacity}, party of {size} does not fit")]
    ComboTooSmall { capacity: u32, size: u32 },

    #[error("Table {0} is already occupied")]
    TableOccupied(u32),

    #[error("Combo is already occupied")]
    ComboOccupied,

    #[error("Table {0} is part of a combo")]
    AlreadyInCombo(u32),

    #[error("Table {0} is not occupied")]
    TableIsFree(u32),

    #[error("A combo needs at least two tables")]
    NotEnoughTables,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<redb::CommitError> for ActionError {
    fn from(err: redb::CommitError) -> Self {
        ActionError::Storage(StorageError::from(err))
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
