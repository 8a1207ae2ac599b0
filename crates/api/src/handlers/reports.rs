//! Handlers for the `/reports` resource (city-wide alerts).

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use flower_core::timeline;
use flower_db::models::report::{CongestionEntry, ViolationEntry};
use flower_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ReportParams;
use crate::state::AppState;

/// GET /api/reports/congestion?days=N&limit=M
///
/// Delayed public-transport stops, longest stop first.
pub async fn congestion(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<Vec<CongestionEntry>>> {
    let since = timeline::window_start(Utc::now(), params.days());
    let entries = ReportRepo::congestion(&state.pool, since, params.limit()).await?;
    Ok(Json(entries))
}

/// GET /api/reports/violations?days=N&limit=M
///
/// Red-light crossings, newest first.
pub async fn violations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<Vec<ViolationEntry>>> {
    let since = timeline::window_start(Utc::now(), params.days());
    let entries = ReportRepo::violations(&state.pool, since, params.limit()).await?;
    Ok(Json(entries))
}
