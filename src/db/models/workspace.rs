//! Workspace model

use serde::{Deserialize, Serialize};

/// One operating session/shift for a restaurant, owning its own tables,
/// parties and combos.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    /// Owning user (workspace scope for all record collections)
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub template_name: String,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    /// At most one active workspace per user
    #[serde(default)]
    pub is_active: bool,
}
