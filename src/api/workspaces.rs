//! Workspace routes.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/workspaces | POST, GET |
//! | /api/workspaces/{id} | GET |
//! | /api/workspaces/{id}/reset | POST |
//! | /api/workspaces/{id}/activate | POST |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::authorize_workspace;
use crate::auth::CurrentUser;
use crate::core::{AppError, AppResult, ServerState};
use crate::db::models::{Combo, Party, TableState, Workspace};
use crate::engine::actions::{
    NewWorkspaceTable, create_workspace, reset_workspace, set_active_workspace,
};
use crate::utils::time::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/workspaces", post(create).get(list))
        .route("/api/workspaces/{id}", get(detail))
        .route("/api/workspaces/{id}/reset", post(reset))
        .route("/api/workspaces/{id}/activate", post(activate))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub template_name: String,
    #[validate(length(min = 1, message = "at least one table is required"))]
    pub tables: Vec<FloorPlanTable>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlanTable {
    pub table_number: u32,
    pub seats: u32,
}

/// Full state of one workspace, the shape the floor view renders from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDetail {
    pub workspace: Workspace,
    pub tables: Vec<TableState>,
    pub parties: Vec<Party>,
    pub combos: Vec<Combo>,
}

async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateWorkspaceRequest>,
) -> AppResult<Json<Workspace>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tables = payload
        .tables
        .into_iter()
        .map(|t| NewWorkspaceTable {
            table_number: t.table_number,
            seats: t.seats,
        })
        .collect();
    let workspace = create_workspace(
        &state.storage,
        &user.user_id,
        &payload.name,
        &payload.template_name,
        tables,
        now_millis(),
    )?;
    Ok(Json(workspace))
}

async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Workspace>>> {
    Ok(Json(state.storage.list_workspaces_for_user(&user.user_id)?))
}

async fn detail(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<WorkspaceDetail>> {
    let workspace = authorize_workspace(&state, &user.user_id, &id)?;
    Ok(Json(WorkspaceDetail {
        tables: state.storage.list_tables(&id)?,
        parties: state.storage.list_parties(&id)?,
        combos: state.storage.list_combos(&id)?,
        workspace,
    }))
}

async fn reset(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<WorkspaceDetail>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    reset_workspace(&state.storage, &id, now_millis())?;
    detail(State(state), user, Path(id)).await
}

async fn activate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Workspace>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let workspace = set_active_workspace(&state.storage, &user.user_id, &id, now_millis())?;
    Ok(Json(workspace))
}
