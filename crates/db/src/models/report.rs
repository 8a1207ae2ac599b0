//! City-wide report and analytics projections.

use flower_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A delayed public-transport stop.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionEntry {
    #[serde(rename = "type")]
    pub vehicle_class: String,
    pub line: Option<String>,
    pub reg_number: Option<String>,
    pub intersection: String,
    pub station: String,
    pub stopped_minutes: i32,
    pub expected_arrival: Timestamp,
    pub actual_arrival: Option<Timestamp>,
}

/// A crossing made while the semaphore was red.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationEntry {
    pub id: DbId,
    #[serde(rename = "type")]
    pub vehicle_class: String,
    pub intersection: String,
    pub street: String,
    pub sense: String,
    pub timestamp: Timestamp,
    pub speed: Option<f64>,
    pub reg_number: Option<String>,
    pub line: Option<String>,
}

/// Headline numbers for the analytics dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_intersections: i64,
    pub total_delays: i64,
    /// Mean `stopped_minutes` of delayed stops, one decimal.
    pub avg_delay_minutes: f64,
    pub total_violations: i64,
}
