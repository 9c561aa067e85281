//! Combo (merged tables) model

use serde::{Deserialize, Serialize};

use super::TableStatus;

/// Runtime merge of two or more tables into one seatable unit.
///
/// `merged_capacity` is the sum of member effective capacities frozen at
/// merge time; later chair overrides on members do not update it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    pub id: String,
    /// Member table numbers, sorted ascending for canonical identity
    pub table_numbers: Vec<u32>,
    pub merged_capacity: u32,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default)]
    pub current_party_id: Option<String>,
    #[serde(default)]
    pub current_party_name: Option<String>,
    #[serde(default)]
    pub last_seated_at: Option<i64>,
    #[serde(default)]
    pub expected_free_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}
