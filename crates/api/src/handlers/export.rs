//! CSV exports.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use flower_core::timeline;
use flower_core::vehicle::VehicleClass;
use flower_db::models::intersection::IntersectionSummary;
use flower_db::models::traffic::CrossingExportRow;
use flower_db::repositories::{IntersectionRepo, ReportRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::parse_date;
use crate::state::AppState;

/// Rows exported per vehicle class.
const MAX_ROWS_PER_CLASS: i64 = 1000;

const INTERSECTIONS_HEADER: &str = "ID,Name,Sector,Latitude,Longitude,Semaphores,Stations";
const TRAFFIC_HEADER: &str = "Type,Timestamp,Intersection,Street,Speed,Vehicle";

/// Quote a text field, doubling embedded quotes.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_response(filename: &'static str, body: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    )
}

fn intersections_csv(rows: &[IntersectionSummary]) -> String {
    let mut out = String::from(INTERSECTIONS_HEADER);
    out.push('\n');
    for r in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            r.id,
            quoted(&r.name),
            r.sector,
            r.lat,
            r.lng,
            r.semaphore_count,
            r.station_count,
        ));
    }
    out
}

/// Rows grouped by class in [`VehicleClass::ALL`] order, chronological
/// within each class.
fn traffic_csv(rows: &[CrossingExportRow]) -> String {
    let mut out = String::from(TRAFFIC_HEADER);
    out.push('\n');
    for class in VehicleClass::ALL {
        for r in rows.iter().filter(|r| r.vehicle_class == class.as_str()) {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                class.label(),
                quoted(&r.crossed_at.to_rfc3339()),
                quoted(&r.intersection_name),
                quoted(&r.street),
                r.speed.map_or(String::new(), |s| s.to_string()),
                r.reg_nr.as_deref().map_or(String::new(), quoted),
            ));
        }
    }
    out
}

/// GET /api/export/intersections/csv
pub async fn intersections(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let rows = IntersectionRepo::list_summaries(&state.pool).await?;
    Ok(csv_response(
        "attachment; filename=\"intersections.csv\"",
        intersections_csv(&rows),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficExportParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/export/traffic/csv?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
///
/// Both dates are inclusive calendar days; the default window is the last
/// seven days up to now.
pub async fn traffic(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<TrafficExportParams>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now();
    let start = match params.start_date.as_deref() {
        Some(raw) => timeline::day_bounds(parse_date(raw)?).0,
        None => now - Duration::days(timeline::DEFAULT_WINDOW_DAYS),
    };
    let end = match params.end_date.as_deref() {
        Some(raw) => timeline::day_bounds(parse_date(raw)?).1,
        None => now,
    };

    let rows = ReportRepo::crossing_export(&state.pool, start, end, MAX_ROWS_PER_CLASS).await?;
    tracing::debug!(rows = rows.len(), "Exporting traffic CSV");

    Ok(csv_response(
        "attachment; filename=\"traffic.csv\"",
        traffic_csv(&rows),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quoted("Piata \"Unirii\""), "\"Piata \"\"Unirii\"\"\"");
    }

    #[test]
    fn intersections_csv_has_header_and_rows() {
        let rows = vec![IntersectionSummary {
            id: 1,
            name: "Unirii".into(),
            sector: 3,
            lat: 44.42,
            lng: 26.1,
            semaphore_count: 4,
            station_count: 2,
        }];
        let csv = intersections_csv(&rows);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], INTERSECTIONS_HEADER);
        assert_eq!(lines[1], "1,\"Unirii\",3,44.42,26.1,4,2");
    }

    #[test]
    fn traffic_csv_groups_by_class_in_fixed_order() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap();
        let row = |class: &str, reg: Option<&str>| CrossingExportRow {
            vehicle_class: class.into(),
            crossed_at: at,
            intersection_name: "Unirii".into(),
            street: "Bd. Unirii".into(),
            speed: Some(42.5),
            reg_nr: reg.map(Into::into),
        };
        let csv = traffic_csv(&[row("BUS", Some("B-1")), row("CAR", None)]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Car,"));
        assert!(lines[1].ends_with(",42.5,"));
        assert!(lines[2].starts_with("Bus,"));
        assert!(lines[2].ends_with(",\"B-1\""));
    }
}
