//! Handlers for the `/intersections` resource: listing, detail and the
//! per-intersection aggregation read path.
//!
//! Aggregations never check that the intersection exists; an unknown id
//! simply aggregates zero rows.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use flower_core::error::CoreError;
use flower_core::timeline::{self, FlowPoint};
use flower_core::vehicle::VolumeCounts;
use flower_db::models::intersection::{Intersection, IntersectionDetail};
use flower_db::models::traffic::{HistorySummary, ScheduleEntry, SemaphoreStatus};
use flower_db::repositories::{IntersectionRepo, SemaphoreRepo, StationRepo, TrafficRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{parse_intersection_id, DateParams, DaysParams, MinutesParams};
use crate::state::AppState;

/// GET /api/intersections
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<Intersection>>> {
    let intersections = IntersectionRepo::list(&state.pool).await?;
    Ok(Json(intersections))
}

/// GET /api/intersections/{id}
///
/// The intersection with its semaphores and stations, or 404.
pub async fn detail(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<IntersectionDetail>> {
    let id = parse_intersection_id(&raw_id)?;

    let intersection = IntersectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Intersection",
            id,
        })?;

    let (semaphores, stations) = tokio::try_join!(
        SemaphoreRepo::list_by_intersection(&state.pool, id),
        StationRepo::list_by_intersection(&state.pool, id),
    )?;

    Ok(Json(IntersectionDetail {
        intersection,
        semaphores,
        stations,
    }))
}

/// GET /api/intersections/{id}/stats/volume?days=N
pub async fn volume(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw_id): Path<String>,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<VolumeCounts>> {
    let id = parse_intersection_id(&raw_id)?;
    let since = timeline::window_start(Utc::now(), params.days());
    let counts = TrafficRepo::volume_counts(&state.pool, id, since).await?;
    Ok(Json(counts))
}

/// GET /api/intersections/{id}/stats/flow?minutes=N
///
/// Per-minute crossing counts for the last N minutes, current minute last.
pub async fn flow(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw_id): Path<String>,
    Query(params): Query<MinutesParams>,
) -> AppResult<Json<Vec<FlowPoint>>> {
    let id = parse_intersection_id(&raw_id)?;
    let minutes = params.minutes();
    let now = Utc::now();
    let since = timeline::truncate_to_minute(now) - Duration::minutes(minutes - 1);

    let rows = TrafficRepo::flow_rows(&state.pool, id, since).await?;
    let points = timeline::minute_buckets(
        now,
        minutes,
        rows.iter().map(|(minute, class, n)| (*minute, class.as_str(), *n)),
    );
    Ok(Json(points))
}

/// GET /api/intersections/{id}/semaphores/current
pub async fn semaphores_current(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Vec<SemaphoreStatus>>> {
    let id = parse_intersection_id(&raw_id)?;
    let status = TrafficRepo::semaphore_status(&state.pool, id).await?;
    Ok(Json(status))
}

/// GET /api/intersections/{id}/schedule?days=N
pub async fn schedule(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw_id): Path<String>,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<Vec<ScheduleEntry>>> {
    let id = parse_intersection_id(&raw_id)?;
    let since = timeline::window_start(Utc::now(), params.days());
    let entries = TrafficRepo::schedule(&state.pool, id, since).await?;
    Ok(Json(entries))
}

/// GET /api/intersections/{id}/history?date=YYYY-MM-DD
///
/// Any date is served; restricting requests to the recent week is up to the
/// caller.
pub async fn history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(raw_id): Path<String>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<HistorySummary>> {
    let id = parse_intersection_id(&raw_id)?;
    let date = params.date()?;
    let summary = TrafficRepo::history(&state.pool, id, date).await?;
    Ok(Json(summary))
}
