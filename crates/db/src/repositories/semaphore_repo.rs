//! Repository for the `semaphores` table.

use flower_core::types::DbId;
use sqlx::PgPool;

use crate::models::intersection::{CreateSemaphore, Semaphore};

const COLUMNS: &str = "id, kind, street, sense";

pub struct SemaphoreRepo;

impl SemaphoreRepo {
    pub async fn create(pool: &PgPool, input: &CreateSemaphore) -> Result<Semaphore, sqlx::Error> {
        let query = format!(
            "INSERT INTO semaphores (intersection_id, kind, street, sense)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Semaphore>(&query)
            .bind(input.intersection_id)
            .bind(&input.kind)
            .bind(&input.street)
            .bind(&input.sense)
            .fetch_one(pool)
            .await
    }

    /// Semaphores mounted on one intersection, ordered by id.
    pub async fn list_by_intersection(
        pool: &PgPool,
        intersection_id: DbId,
    ) -> Result<Vec<Semaphore>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM semaphores WHERE intersection_id = $1 ORDER BY id");
        sqlx::query_as::<_, Semaphore>(&query)
            .bind(intersection_id)
            .fetch_all(pool)
            .await
    }
}
