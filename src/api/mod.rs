//! HTTP API.
//!
//! # Modules
//!
//! - [`health`] - liveness probe (public)
//! - [`workspaces`] - workspace lifecycle
//! - [`parties`] - waitlist
//! - [`tables`] - per-table transitions (seat, turn, clear, chairs)
//! - [`combos`] - table merging
//! - [`assign`] - auto-assign / suggest
//! - [`dashboard`] - historical KPIs
//!
//! Every route except `/api/health` requires a caller identity
//! ([`crate::auth::CurrentUser`]); workspace-scoped routes additionally
//! check that the workspace belongs to the caller.

pub mod assign;
pub mod combos;
pub mod dashboard;
pub mod health;
pub mod parties;
pub mod tables;
pub mod workspaces;

use axum::Router;

use crate::core::{AppError, AppResult, ServerState};
use crate::db::models::Workspace;

pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(workspaces::router())
        .merge(parties::router())
        .merge(tables::router())
        .merge(combos::router())
        .merge(assign::router())
        .merge(dashboard::router())
}

/// Load a workspace and verify it belongs to the caller. Foreign
/// workspaces are reported as not found rather than forbidden.
pub(crate) fn authorize_workspace(
    state: &ServerState,
    user_id: &str,
    workspace_id: &str,
) -> AppResult<Workspace> {
    let workspace = state
        .storage
        .get_workspace(workspace_id)?
        .filter(|ws| ws.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("Workspace {workspace_id} not found")))?;
    Ok(workspace)
}
