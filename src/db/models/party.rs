//! Waitlist party model

use serde::{Deserialize, Serialize};

/// Party lifecycle. WAITING may transition exactly once to any of the
/// other three; the terminal states are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyStatus {
    #[default]
    Waiting,
    Seated,
    Canceled,
    NoShow,
}

impl PartyStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PartyStatus::Waiting)
    }
}

/// Per-workspace waitlist entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    pub name: String,
    pub size: u32,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: PartyStatus,
    /// Added-to-waitlist time, immutable
    pub created_at: i64,
    /// Set exactly once on WAITING → SEATED
    #[serde(default)]
    pub seated_at: Option<i64>,
    /// Snapshot estimate computed once at creation, not live
    #[serde(default)]
    pub quoted_wait_min: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_is_the_only_non_terminal_status() {
        assert!(!PartyStatus::Waiting.is_terminal());
        assert!(PartyStatus::Seated.is_terminal());
        assert!(PartyStatus::Canceled.is_terminal());
        assert!(PartyStatus::NoShow.is_terminal());
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_string(&PartyStatus::NoShow).unwrap(), "\"NO_SHOW\"");
    }
}
