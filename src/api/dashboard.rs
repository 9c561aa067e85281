//! Dashboard route.
//!
//! | Path | Method |
//! |------|--------|
//! | /api/dashboard?start=YYYY-MM-DD&end=YYYY-MM-DD | GET |
//!
//! The date range is inclusive and interpreted in the configured
//! business timezone.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::{AppError, AppResult, ServerState};
use crate::stats::{DashboardStats, get_dashboard_stats};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub start: String,
    pub end: String,
}

async fn dashboard(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardStats>> {
    let tz = state.config.timezone;
    let start_date = parse_date(&query.start)?;
    let end_date = parse_date(&query.end)?;
    if end_date < start_date {
        return Err(AppError::Validation("End date is before start date".into()));
    }

    let start_millis = day_start_millis(start_date, tz);
    // Inclusive end: everything strictly before the next day's start
    let end_millis = day_end_millis(end_date, tz) - 1;

    let stats = get_dashboard_stats(&state.storage, &user.user_id, start_millis, end_millis, tz)?;
    Ok(Json(stats))
}
