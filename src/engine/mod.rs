//! Availability estimation and table assignment.
//!
//! `wait` is the pure duration/availability model, `assign` the policy on
//! top of it, `actions` the transactional state machine.

pub mod actions;
pub mod assign;
pub mod wait;

pub use assign::{AUTO_SEAT_THRESHOLD_MIN, AssignOutcome, TableSuggestion};
