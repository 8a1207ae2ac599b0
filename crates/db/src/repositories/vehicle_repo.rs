//! Repository for the `vehicles` table.

use sqlx::PgPool;

use crate::models::vehicle::{CreateVehicle, Vehicle};

const COLUMNS: &str = "id, vehicle_class, reg_nr, line";

pub struct VehicleRepo;

impl VehicleRepo {
    pub async fn create(pool: &PgPool, input: &CreateVehicle) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (vehicle_class, reg_nr, line)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(&input.vehicle_class)
            .bind(&input.reg_nr)
            .bind(&input.line)
            .fetch_one(pool)
            .await
    }

    /// Up to `per_class` vehicles of one class, lowest id first.
    pub async fn list_by_class(
        pool: &PgPool,
        vehicle_class: &str,
        per_class: i64,
    ) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles
             WHERE vehicle_class = $1
             ORDER BY id
             LIMIT $2"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(vehicle_class)
            .bind(per_class)
            .fetch_all(pool)
            .await
    }
}
