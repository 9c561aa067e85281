//! Per-table transition routes.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/workspaces/{id}/tables | GET |
//! | /api/workspaces/{id}/tables/{n}/seat | POST |
//! | /api/workspaces/{id}/tables/{n}/turning | POST |
//! | /api/workspaces/{id}/tables/{n}/clear | POST |
//! | /api/workspaces/{id}/tables/{n}/add-minutes | POST |
//! | /api/workspaces/{id}/tables/{n}/chairs/add | POST |
//! | /api/workspaces/{id}/tables/{n}/chairs/remove | POST |
//! | /api/workspaces/{id}/kitchen-slow | POST |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::api::authorize_workspace;
use crate::auth::CurrentUser;
use crate::core::{AppResult, ServerState};
use crate::db::models::{Party, TableState};
use crate::engine::actions::{
    add_chair, add_minutes_to_table, clear_table, kitchen_running_slow, mark_table_turning,
    remove_chair, seat_party_at_table,
};
use crate::engine::wait::display_available_at;
use crate::utils::time::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/workspaces/{id}/tables", get(list))
        .route("/api/workspaces/{id}/tables/{n}/seat", post(seat))
        .route("/api/workspaces/{id}/tables/{n}/turning", post(turning))
        .route("/api/workspaces/{id}/tables/{n}/clear", post(clear))
        .route("/api/workspaces/{id}/tables/{n}/add-minutes", post(add_minutes))
        .route("/api/workspaces/{id}/tables/{n}/chairs/add", post(chair_add))
        .route("/api/workspaces/{id}/tables/{n}/chairs/remove", post(chair_remove))
        .route("/api/workspaces/{id}/kitchen-slow", post(kitchen_slow))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    pub party_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MinutesRequest {
    #[serde(default)]
    pub minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatResponse {
    pub party: Party,
    pub table: TableState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenSlowResponse {
    pub tables_touched: usize,
}

/// Table record decorated with the floor view's availability estimate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    #[serde(flatten)]
    pub table: TableState,
    pub estimated_free_at: i64,
}

async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TableView>>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let now = now_millis();
    let tables = state
        .storage
        .list_tables(&id)?
        .into_iter()
        .map(|table| TableView {
            estimated_free_at: display_available_at(&table, now),
            table,
        })
        .collect();
    Ok(Json(tables))
}

async fn seat(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, n)): Path<(String, u32)>,
    Json(payload): Json<SeatRequest>,
) -> AppResult<Json<SeatResponse>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let (party, table) =
        seat_party_at_table(&state.storage, &id, &payload.party_id, n, now_millis())?;
    Ok(Json(SeatResponse { party, table }))
}

async fn turning(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, n)): Path<(String, u32)>,
    Json(payload): Json<MinutesRequest>,
) -> AppResult<Json<TableState>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let table = mark_table_turning(&state.storage, &id, n, payload.minutes, now_millis())?;
    Ok(Json(table))
}

async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, n)): Path<(String, u32)>,
) -> AppResult<Json<TableState>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let table = clear_table(&state.storage, &id, n, now_millis())?;
    Ok(Json(table))
}

async fn add_minutes(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, n)): Path<(String, u32)>,
    Json(payload): Json<MinutesRequest>,
) -> AppResult<Json<TableState>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let table = add_minutes_to_table(&state.storage, &id, n, payload.minutes, now_millis())?;
    Ok(Json(table))
}

async fn chair_add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, n)): Path<(String, u32)>,
) -> AppResult<Json<TableState>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let table = add_chair(&state.storage, &id, n, now_millis())?;
    Ok(Json(table))
}

async fn chair_remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, n)): Path<(String, u32)>,
) -> AppResult<Json<TableState>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let table = remove_chair(&state.storage, &id, n, now_millis())?;
    Ok(Json(table))
}

async fn kitchen_slow(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<KitchenSlowResponse>> {
    authorize_workspace(&state, &user.user_id, &id)?;
    let tables_touched = kitchen_running_slow(&state.storage, &id, now_millis())?;
    Ok(Json(KitchenSlowResponse { tables_touched }))
}
