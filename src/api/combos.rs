//! Table merge routes.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/workspaces/{id}/combos | POST, GET |
//! | /api/workspaces/{id}/combos/{comboId} | DELETE |
//! | /api/workspaces/{id}/combos/{comboId}/seat | POST |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use serde::{Deserialize, Serialize};

use crate::api::authorize_workspace;
use crate::auth::CurrentUser;
use crate::core::{AppResult, ServerState};
use crate::db::models::{Combo, Party};
use crate::engine::actions::{create_combo, delete_combo, seat_party_at_combo};
use crate::utils::time::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/workspaces/{id}/combos", post(create).get(list))
        .route("/api/workspaces/{id}/combos/{combo_id}", delete(split))
        .route("/api/workspaces/{id}/combos/{combo_id}/seat", post(seat))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComboRequest {
    pub table_numbers: Vec<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatComboRequest {
    pub party_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatComboResponse {
    pub party: Party,
    pub combo: Combo,
}

async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CreateComboRequest>,
) -> AppResult<Json<Combo>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let combo = create_combo(&state.storage, &id, payload.table_numbers, now_millis())?;
    Ok(Json(combo))
}

async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Combo>>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    Ok(Json(state.storage.list_combos(&id)?))
}

async fn split(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, combo_id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    delete_combo(&state.storage, &id, &combo_id, now_millis())?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

async fn seat(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, combo_id)): Path<(String, String)>,
    Json(payload): Json<SeatComboRequest>,
) -> AppResult<Json<SeatComboResponse>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let (party, combo) =
        seat_party_at_combo(&state.storage, &id, &payload.party_id, &combo_id, now_millis())?;
    Ok(Json(SeatComboResponse { party, combo }))
}
