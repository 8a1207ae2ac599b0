//! Inserts for the append-only fact tables.
//!
//! The read path never writes; these exist for ingestion tooling and test
//! fixtures.

use sqlx::PgPool;

use crate::models::event::{
    ColorChange, CreateColorChange, CreateCrossing, CreateStop, Crossing, Stop,
};

pub struct CrossingRepo;

impl CrossingRepo {
    pub async fn create(pool: &PgPool, input: &CreateCrossing) -> Result<Crossing, sqlx::Error> {
        sqlx::query_as::<_, Crossing>(
            "INSERT INTO crossings (semaphore_id, vehicle_class, vehicle_id, speed, crossed_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, semaphore_id, vehicle_class, vehicle_id, speed, crossed_at",
        )
        .bind(input.semaphore_id)
        .bind(&input.vehicle_class)
        .bind(input.vehicle_id)
        .bind(input.speed)
        .bind(input.crossed_at)
        .fetch_one(pool)
        .await
    }
}

pub struct StopRepo;

impl StopRepo {
    pub async fn create(pool: &PgPool, input: &CreateStop) -> Result<Stop, sqlx::Error> {
        sqlx::query_as::<_, Stop>(
            "INSERT INTO stops
                (vehicle_id, station_id, stopped_minutes, expected_arrival, actual_arrival)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, vehicle_id, station_id, stopped_minutes,
                       expected_arrival, actual_arrival",
        )
        .bind(input.vehicle_id)
        .bind(input.station_id)
        .bind(input.stopped_minutes)
        .bind(input.expected_arrival)
        .bind(input.actual_arrival)
        .fetch_one(pool)
        .await
    }
}

pub struct ColorChangeRepo;

impl ColorChangeRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateColorChange,
    ) -> Result<ColorChange, sqlx::Error> {
        sqlx::query_as::<_, ColorChange>(
            "INSERT INTO color_changes (semaphore_id, color, changed_at)
             VALUES ($1, $2, $3)
             RETURNING id, semaphore_id, color, changed_at",
        )
        .bind(input.semaphore_id)
        .bind(&input.color)
        .bind(input.changed_at)
        .fetch_one(pool)
        .await
    }
}
