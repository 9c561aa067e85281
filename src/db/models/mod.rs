//! Record models.
//!
//! Every field has a defined default so records deserialize cleanly even
//! when written by older versions; no partial/merge semantics anywhere.

pub mod combo;
pub mod party;
pub mod seating;
pub mod table;
pub mod workspace;

pub use combo::Combo;
pub use party::{Party, PartyStatus};
pub use seating::SeatingRecord;
pub use table::{CAPACITY_OVERRIDE_MAX, TableState, TableStatus};
pub use workspace::Workspace;
