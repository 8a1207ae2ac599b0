//! Repository for the `stations` table.

use flower_core::types::DbId;
use sqlx::PgPool;

use crate::models::intersection::{CreateStation, Station};

const COLUMNS: &str = "id, name, intersection_id, vehicle_class";

pub struct StationRepo;

impl StationRepo {
    pub async fn create(pool: &PgPool, input: &CreateStation) -> Result<Station, sqlx::Error> {
        let query = format!(
            "INSERT INTO stations (intersection_id, name, vehicle_class)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(input.intersection_id)
            .bind(&input.name)
            .bind(&input.vehicle_class)
            .fetch_one(pool)
            .await
    }

    /// Stations of every transit class at one intersection, grouped by class.
    pub async fn list_by_intersection(
        pool: &PgPool,
        intersection_id: DbId,
    ) -> Result<Vec<Station>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stations
             WHERE intersection_id = $1
             ORDER BY vehicle_class, id"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(intersection_id)
            .fetch_all(pool)
            .await
    }
}
