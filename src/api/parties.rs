//! Waitlist routes.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/workspaces/{id}/parties | POST, GET |
//! | /api/workspaces/{id}/parties/{partyId}/status | POST |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::authorize_workspace;
use crate::auth::CurrentUser;
use crate::core::{AppError, AppResult, ServerState};
use crate::db::models::{Party, PartyStatus};
use crate::engine::actions::{NewParty, add_party, set_party_status};
use crate::utils::time::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/workspaces/{id}/parties", post(create).get(list))
        .route("/api/workspaces/{id}/parties/{party_id}/status", post(update_status))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 1, max = 50))]
    pub size: u32,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartyStatusRequest {
    pub status: PartyStatus,
}

async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CreatePartyRequest>,
) -> AppResult<Json<Party>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    authorize_workspace(&state, &user.user_id, &id)?;

    let party = add_party(
        &state.storage,
        &id,
        NewParty {
            name: payload.name,
            size: payload.size,
            phone: payload.phone,
            notes: payload.notes,
        },
        now_millis(),
    )?;
    Ok(Json(party))
}

async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Party>>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    Ok(Json(state.storage.list_parties(&id)?))
}

async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, party_id)): Path<(String, String)>,
    Json(payload): Json<UpdatePartyStatusRequest>,
) -> AppResult<Json<Party>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let party = set_party_status(&state.storage, &id, &party_id, payload.status, now_millis())?;
    Ok(Json(party))
}
