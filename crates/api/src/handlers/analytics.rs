//! Handlers for the `/analytics` resource.
//!
//! Day series are bucketed by UTC calendar day and zero-filled, ending today.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use flower_core::timeline::{self, DailyCounts, DailyDelays};
use flower_db::models::report::DashboardSummary;
use flower_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::DaysParams;
use crate::state::AppState;

/// GET /api/analytics/dashboard?days=N
pub async fn dashboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<DashboardSummary>> {
    let since = timeline::window_start(Utc::now(), params.days());
    let summary = ReportRepo::dashboard_summary(&state.pool, since).await?;
    Ok(Json(summary))
}

/// GET /api/analytics/traffic-flow?days=N
pub async fn traffic_flow(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<Vec<DailyCounts>>> {
    let days = params.days();
    let today = Utc::now().date_naive();
    let (since, _) = timeline::day_bounds(today - chrono::Duration::days(days - 1));

    let rows = ReportRepo::daily_crossings(&state.pool, since).await?;
    let series = timeline::daily_buckets(
        today,
        days,
        rows.iter().map(|(day, class, n)| (*day, class.as_str(), *n)),
    );
    Ok(Json(series))
}

/// GET /api/analytics/congestion-trends?days=N
pub async fn congestion_trends(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<Vec<DailyDelays>>> {
    let days = params.days();
    let today = Utc::now().date_naive();
    let (since, _) = timeline::day_bounds(today - chrono::Duration::days(days - 1));

    let rows = ReportRepo::daily_delays(&state.pool, since).await?;
    Ok(Json(timeline::daily_delays(today, days, rows)))
}
