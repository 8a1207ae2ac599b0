//! Handler for side-by-side intersection comparison.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use flower_core::timeline;
use flower_core::types::DbId;
use flower_core::vehicle::{VehicleClass, VolumeCounts};
use flower_db::models::traffic::IntersectionComparison;
use flower_db::repositories::{IntersectionRepo, TrafficRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::parse_id_list;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ComparisonParams {
    pub ids: Option<String>,
    pub days: Option<String>,
}

/// GET /api/comparison/intersections?ids=1,2,3&days=N
///
/// Unknown ids are skipped; the response follows ascending id order.
pub async fn intersections(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ComparisonParams>,
) -> AppResult<Json<Vec<IntersectionComparison>>> {
    let raw = params
        .ids
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Intersection IDs required (comma-separated)".into())
        })?;

    let ids = parse_id_list(raw);
    if ids.is_empty() {
        return Err(AppError::BadRequest(
            "No valid intersection IDs provided".into(),
        ));
    }

    let intersections = IntersectionRepo::list_by_ids(&state.pool, &ids).await?;
    if intersections.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let existing: Vec<DbId> = intersections.iter().map(|i| i.id).collect();
    let since = timeline::window_start(
        Utc::now(),
        timeline::resolve_days(params.days.as_deref()),
    );
    let rows = TrafficRepo::volume_rows_for(&state.pool, &existing, since).await?;

    let mut stats: HashMap<DbId, VolumeCounts> = HashMap::new();
    for (id, class, count) in rows {
        if let Some(class) = VehicleClass::parse(&class) {
            stats.entry(id).or_default().add(class, count);
        }
    }

    let comparisons = intersections
        .into_iter()
        .map(|i| IntersectionComparison {
            stats: stats.get(&i.id).copied().unwrap_or_default(),
            id: i.id,
            name: i.name,
            sector: i.sector,
        })
        .collect();

    Ok(Json(comparisons))
}
