//! Append-only fact rows: crossings, stops and color changes.

use flower_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One vehicle or pedestrian traversal recorded against a semaphore.
#[derive(Debug, Clone, FromRow)]
pub struct Crossing {
    pub id: DbId,
    pub semaphore_id: DbId,
    pub vehicle_class: String,
    pub vehicle_id: Option<DbId>,
    pub speed: Option<f64>,
    pub crossed_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateCrossing {
    pub semaphore_id: DbId,
    pub vehicle_class: String,
    pub vehicle_id: Option<DbId>,
    pub speed: Option<f64>,
    pub crossed_at: Timestamp,
}

/// One scheduled-arrival observation at a station.
#[derive(Debug, Clone, FromRow)]
pub struct Stop {
    pub id: DbId,
    pub vehicle_id: DbId,
    pub station_id: DbId,
    pub stopped_minutes: i32,
    pub expected_arrival: Timestamp,
    pub actual_arrival: Option<Timestamp>,
}

#[derive(Debug)]
pub struct CreateStop {
    pub vehicle_id: DbId,
    pub station_id: DbId,
    pub stopped_minutes: i32,
    pub expected_arrival: Timestamp,
    pub actual_arrival: Option<Timestamp>,
}

/// A semaphore switching to a new color.
#[derive(Debug, Clone, FromRow)]
pub struct ColorChange {
    pub id: DbId,
    pub semaphore_id: DbId,
    pub color: String,
    pub changed_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateColorChange {
    pub semaphore_id: DbId,
    pub color: String,
    pub changed_at: Timestamp,
}
