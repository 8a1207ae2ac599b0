//! Repository for the `intersections` table.

use flower_core::types::DbId;
use sqlx::PgPool;

use crate::models::intersection::{CreateIntersection, Intersection, IntersectionSummary};

const COLUMNS: &str = "id, name, sector, lat, lng";

/// Read access to intersections, plus inserts for fixtures and tooling.
pub struct IntersectionRepo;

impl IntersectionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateIntersection,
    ) -> Result<Intersection, sqlx::Error> {
        let query = format!(
            "INSERT INTO intersections (name, sector, lat, lng)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Intersection>(&query)
            .bind(&input.name)
            .bind(input.sector)
            .bind(input.lat)
            .bind(input.lng)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Intersection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM intersections WHERE id = $1");
        sqlx::query_as::<_, Intersection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All intersections ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Intersection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM intersections ORDER BY name, id");
        sqlx::query_as::<_, Intersection>(&query)
            .fetch_all(pool)
            .await
    }

    /// The subset of `ids` that exist, in ascending id order.
    pub async fn list_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Intersection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM intersections WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Intersection>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM intersections")
            .fetch_one(pool)
            .await
    }

    /// Every intersection with its semaphore and station counts.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<IntersectionSummary>, sqlx::Error> {
        sqlx::query_as::<_, IntersectionSummary>(
            "SELECT i.id, i.name, i.sector, i.lat, i.lng,
                    (SELECT COUNT(*) FROM semaphores s WHERE s.intersection_id = i.id)
                        AS semaphore_count,
                    (SELECT COUNT(*) FROM stations st WHERE st.intersection_id = i.id)
                        AS station_count
             FROM intersections i
             ORDER BY i.id",
        )
        .fetch_all(pool)
        .await
    }
}
