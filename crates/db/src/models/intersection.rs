//! Static reference entities: intersections, their semaphores and stations.

use flower_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `intersections` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Intersection {
    pub id: DbId,
    pub name: String,
    /// Administrative grouping label.
    pub sector: i32,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug)]
pub struct CreateIntersection {
    pub name: String,
    pub sector: i32,
    pub lat: f64,
    pub lng: f64,
}

/// Row from the `semaphores` table (one traffic light at one approach).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Semaphore {
    pub id: DbId,
    #[serde(rename = "type")]
    pub kind: String,
    pub street: String,
    pub sense: String,
}

#[derive(Debug)]
pub struct CreateSemaphore {
    pub intersection_id: DbId,
    pub kind: String,
    pub street: String,
    pub sense: String,
}

/// Row from the `stations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: DbId,
    pub name: String,
    pub intersection_id: DbId,
    /// `BUS`, `TRAM` or `TROLEIBUS`.
    #[serde(rename = "type")]
    pub vehicle_class: String,
}

#[derive(Debug)]
pub struct CreateStation {
    pub intersection_id: DbId,
    pub name: String,
    pub vehicle_class: String,
}

/// An intersection together with everything mounted on it.
#[derive(Debug, Clone, Serialize)]
pub struct IntersectionDetail {
    #[serde(flatten)]
    pub intersection: Intersection,
    pub semaphores: Vec<Semaphore>,
    pub stations: Vec<Station>,
}

/// Per-intersection equipment counts used by the CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct IntersectionSummary {
    pub id: DbId,
    pub name: String,
    pub sector: i32,
    pub lat: f64,
    pub lng: f64,
    pub semaphore_count: i64,
    pub station_count: i64,
}
