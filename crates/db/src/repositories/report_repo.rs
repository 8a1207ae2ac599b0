//! City-wide reports, analytics and exports.

use chrono::NaiveDate;
use flower_core::schedule::DELAY_THRESHOLD_MINUTES;
use flower_core::signal::VIOLATION_COLOR;
use flower_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::report::{CongestionEntry, DashboardSummary, ViolationEntry};
use crate::models::traffic::CrossingExportRow;
use crate::repositories::traffic_repo::color_at_crossing_is;

pub struct ReportRepo;

impl ReportRepo {
    /// Delayed stops since `since`, longest stop first.
    pub async fn congestion(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<CongestionEntry>, sqlx::Error> {
        sqlx::query_as::<_, CongestionEntry>(
            "SELECT v.vehicle_class, v.line, v.reg_nr AS reg_number,
                    i.name AS intersection, st.name AS station,
                    sp.stopped_minutes, sp.expected_arrival, sp.actual_arrival
             FROM stops sp
             JOIN stations st ON st.id = sp.station_id
             JOIN intersections i ON i.id = st.intersection_id
             JOIN vehicles v ON v.id = sp.vehicle_id
             WHERE sp.expected_arrival >= $1 AND sp.stopped_minutes >= $2
             ORDER BY sp.stopped_minutes DESC, sp.expected_arrival DESC
             LIMIT $3",
        )
        .bind(since)
        .bind(DELAY_THRESHOLD_MINUTES)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Red-light crossings since `since`, newest first.
    pub async fn violations(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<ViolationEntry>, sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.vehicle_class, i.name AS intersection, s.street, s.sense,
                    c.crossed_at AS timestamp, c.speed, v.reg_nr AS reg_number, v.line
             FROM crossings c
             JOIN semaphores s ON s.id = c.semaphore_id
             JOIN intersections i ON i.id = s.intersection_id
             LEFT JOIN vehicles v ON v.id = c.vehicle_id
             WHERE c.crossed_at >= $1 AND {}
             ORDER BY c.crossed_at DESC, c.id DESC
             LIMIT $3",
            color_at_crossing_is(2)
        );
        sqlx::query_as::<_, ViolationEntry>(&query)
            .bind(since)
            .bind(VIOLATION_COLOR)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Headline numbers for the analytics dashboard.
    pub async fn dashboard_summary(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<DashboardSummary, sqlx::Error> {
        let total_intersections =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM intersections")
                .fetch_one(pool)
                .await?;

        let (total_delays, avg_delay) = sqlx::query_as::<_, (i64, Option<f64>)>(
            "SELECT COUNT(*), AVG(stopped_minutes)::FLOAT8
             FROM stops
             WHERE expected_arrival >= $1 AND stopped_minutes >= $2",
        )
        .bind(since)
        .bind(DELAY_THRESHOLD_MINUTES)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT COUNT(*) FROM crossings c WHERE c.crossed_at >= $1 AND {}",
            color_at_crossing_is(2)
        );
        let total_violations = sqlx::query_scalar::<_, i64>(&query)
            .bind(since)
            .bind(VIOLATION_COLOR)
            .fetch_one(pool)
            .await?;

        Ok(DashboardSummary {
            total_intersections,
            total_delays,
            avg_delay_minutes: round_one_decimal(avg_delay.unwrap_or(0.0)),
            total_violations,
        })
    }

    /// `(UTC day, vehicle class, count)` crossing rows since `since`.
    pub async fn daily_crossings(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<(NaiveDate, String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, String, i64)>(
            "SELECT (crossed_at AT TIME ZONE 'UTC')::DATE AS day, vehicle_class, COUNT(*)
             FROM crossings
             WHERE crossed_at >= $1
             GROUP BY day, vehicle_class",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// `(UTC day, delayed stop count)` rows since `since`.
    pub async fn daily_delays(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, i64)>(
            "SELECT (expected_arrival AT TIME ZONE 'UTC')::DATE AS day, COUNT(*)
             FROM stops
             WHERE expected_arrival >= $1 AND stopped_minutes >= $2
             GROUP BY day",
        )
        .bind(since)
        .bind(DELAY_THRESHOLD_MINUTES)
        .fetch_all(pool)
        .await
    }

    /// Crossings in `[start, end)` for the traffic CSV, at most `per_class`
    /// rows of each vehicle class, earliest first.
    pub async fn crossing_export(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
        per_class: i64,
    ) -> Result<Vec<CrossingExportRow>, sqlx::Error> {
        sqlx::query_as::<_, CrossingExportRow>(
            "SELECT vehicle_class, crossed_at, intersection_name, street, speed, reg_nr
             FROM (
                 SELECT c.vehicle_class, c.crossed_at, i.name AS intersection_name,
                        s.street, c.speed, v.reg_nr,
                        ROW_NUMBER() OVER (
                            PARTITION BY c.vehicle_class ORDER BY c.crossed_at, c.id
                        ) AS rn
                 FROM crossings c
                 JOIN semaphores s ON s.id = c.semaphore_id
                 JOIN intersections i ON i.id = s.intersection_id
                 LEFT JOIN vehicles v ON v.id = c.vehicle_id
                 WHERE c.crossed_at >= $1 AND c.crossed_at < $2
             ) ranked
             WHERE rn <= $3
             ORDER BY crossed_at",
        )
        .bind(start)
        .bind(end)
        .bind(per_class)
        .fetch_all(pool)
        .await
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_average_to_one_decimal() {
        assert_eq!(round_one_decimal(4.25), 4.3);
        assert_eq!(round_one_decimal(3.0), 3.0);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }
}
