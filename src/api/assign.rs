//! Auto-assign and suggest routes.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/workspaces/{id}/assign/next | POST |
//! | /api/workspaces/{id}/assign/suggest | POST |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::api::authorize_workspace;
use crate::auth::CurrentUser;
use crate::core::{AppResult, ServerState};
use crate::engine::assign::{AssignOutcome, auto_assign_next, suggest_for_party};
use crate::utils::time::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/workspaces/{id}/assign/next", post(next))
        .route("/api/workspaces/{id}/assign/suggest", post(suggest))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignNextRequest {
    /// Supplying a size switches the label to size-priority mode. Party
    /// selection stays FCFS either way; the value is echoed back for the
    /// host view.
    #[serde(default)]
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub party_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignNextResponse {
    #[serde(flatten)]
    pub outcome: AssignOutcome,
    pub mode: &'static str,
    pub target_size: Option<u32>,
}

async fn next(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AssignNextRequest>,
) -> AppResult<Json<AssignNextResponse>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let outcome = auto_assign_next(&state.storage, &id, now_millis())?;
    let mode = if payload.size.is_some() { "SIZE_PRIORITY" } else { "FCFS" };
    Ok(Json(AssignNextResponse {
        outcome,
        mode,
        target_size: payload.size,
    }))
}

async fn suggest(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SuggestRequest>,
) -> AppResult<Json<AssignOutcome>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let outcome = suggest_for_party(&state.storage, &id, &payload.party_id, now_millis())?;
    Ok(Json(outcome))
}
