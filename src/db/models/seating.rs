//! Historical seating record (append-only)

use serde::{Deserialize, Serialize};

/// One stint of a party at a table. Never mutated after `cleared_at` is
/// set; consumed only by the dashboard aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeatingRecord {
    pub id: String,
    pub party_id: String,
    pub table_number: u32,
    pub seated_at: i64,
    #[serde(default)]
    pub cleared_at: Option<i64>,
    /// Set when cleared
    #[serde(default)]
    pub duration_min: Option<i64>,
}
