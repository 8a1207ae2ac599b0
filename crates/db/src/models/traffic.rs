//! Projections produced by the per-intersection aggregation read path.

use flower_core::timeline::HourlyCount;
use flower_core::types::{DbId, Timestamp};
use flower_core::vehicle::VolumeCounts;
use serde::Serialize;
use sqlx::FromRow;

/// A semaphore with the color of its most recent color change.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemaphoreStatus {
    pub id: DbId,
    #[serde(rename = "type")]
    pub kind: String,
    pub street: String,
    pub sense: String,
    pub current_color: String,
}

/// One public-transport stop at a station of the intersection.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// `BUS`, `TRAM` or `TROLEIBUS`.
    #[serde(rename = "type")]
    pub vehicle_class: String,
    pub line: Option<String>,
    pub reg_number: Option<String>,
    pub station_name: String,
    pub expected_arrival: Timestamp,
    pub actual_arrival: Option<Timestamp>,
    pub stopped_minutes: i32,
    /// Display flag derived from `stopped_minutes`; not stored.
    #[sqlx(skip)]
    pub delayed: bool,
}

/// Activity summary of one intersection over one calendar day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub violations: i64,
    pub violations_by_type: VolumeCounts,
    pub total_vehicles: i64,
    pub hourly_activity: Vec<HourlyCount>,
}

/// Side-by-side volume numbers for the comparison view.
#[derive(Debug, Clone, Serialize)]
pub struct IntersectionComparison {
    pub id: DbId,
    pub name: String,
    pub sector: i32,
    pub stats: VolumeCounts,
}

/// One crossing flattened for the traffic CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct CrossingExportRow {
    pub vehicle_class: String,
    pub crossed_at: Timestamp,
    pub intersection_name: String,
    pub street: String,
    pub speed: Option<f64>,
    pub reg_nr: Option<String>,
}
