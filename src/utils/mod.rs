//! Utility module — logging and time helpers.

pub mod logger;
pub mod time;
