//! Table state model

use serde::{Deserialize, Serialize};

/// Ad-hoc chair overrides are clamped to this many extra seats.
pub const CAPACITY_OVERRIDE_MAX: u32 = 2;

/// Table lifecycle: `FREE ⇄ TURNING ⇄ OCCUPIED → FREE`.
///
/// TURNING may also arise directly from FREE ("preparing an empty table").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Free,
    Occupied,
    Turning,
}

/// Per-workspace table record, keyed by table number.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub table_number: u32,
    /// Seats from the floor template
    pub base_capacity: u32,
    /// Extra chairs added at runtime, clamped to 0..=CAPACITY_OVERRIDE_MAX
    #[serde(default)]
    pub capacity_override: u32,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default)]
    pub last_seated_at: Option<i64>,
    #[serde(default)]
    pub expected_free_at: Option<i64>,
    #[serde(default)]
    pub current_party_id: Option<String>,
    #[serde(default)]
    pub current_party_name: Option<String>,
    /// Set while the table is merged into a combo; the table is then not
    /// individually assignable.
    #[serde(default)]
    pub in_combo_id: Option<String>,
    #[serde(default)]
    pub updated_at: i64,
}

impl TableState {
    pub fn new(table_number: u32, seats: u32, now: i64) -> Self {
        Self {
            table_number,
            base_capacity: seats,
            updated_at: now,
            ..Default::default()
        }
    }

    /// Effective capacity: template seats plus chair overrides.
    /// Always derived, never stored.
    pub fn effective_capacity(&self) -> u32 {
        self.base_capacity + self.capacity_override.min(CAPACITY_OVERRIDE_MAX)
    }

    /// Reset every occupancy field to the FREE defaults.
    pub fn reset_to_free(&mut self, now: i64) {
        self.status = TableStatus::Free;
        self.last_seated_at = None;
        self.expected_free_at = None;
        self.current_party_id = None;
        self.current_party_name = None;
        self.updated_at = now;
    }
}
