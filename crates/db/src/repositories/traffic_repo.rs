//! Per-intersection aggregation read path.
//!
//! Every query is scoped to one intersection through its semaphores (for
//! crossings and color changes) or its stations (for stops). Missing rows
//! produce zeroed results, never errors.

use chrono::NaiveDate;
use flower_core::schedule;
use flower_core::signal::{DEFAULT_COLOR, VIOLATION_COLOR};
use flower_core::timeline::{self, HourlyCount};
use flower_core::types::{DbId, Timestamp};
use flower_core::vehicle::VolumeCounts;
use sqlx::PgPool;

use crate::models::traffic::{HistorySummary, ScheduleEntry, SemaphoreStatus};

/// SQL predicate that is true when crossing `c` happened while its semaphore
/// showed the color bound at `$param`.
///
/// The color in force is the latest change at or before the crossing. A
/// semaphore with no earlier change is never in violation.
pub(crate) fn color_at_crossing_is(param: usize) -> String {
    format!(
        "(SELECT cc.color FROM color_changes cc
          WHERE cc.semaphore_id = c.semaphore_id AND cc.changed_at <= c.crossed_at
          ORDER BY cc.changed_at DESC, cc.id DESC
          LIMIT 1) = ${param}"
    )
}

/// Read-only aggregations over crossings, stops and color changes.
pub struct TrafficRepo;

impl TrafficRepo {
    /// Crossings per vehicle class at the intersection since `since`.
    ///
    /// An intersection without semaphores yields all-zero counts.
    pub async fn volume_counts(
        pool: &PgPool,
        intersection_id: DbId,
        since: Timestamp,
    ) -> Result<VolumeCounts, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT c.vehicle_class, COUNT(*)
             FROM crossings c
             JOIN semaphores s ON s.id = c.semaphore_id
             WHERE s.intersection_id = $1 AND c.crossed_at >= $2
             GROUP BY c.vehicle_class",
        )
        .bind(intersection_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(VolumeCounts::from_rows(
            rows.iter().map(|(class, n)| (class.as_str(), *n)),
        ))
    }

    /// `(intersection id, vehicle class, count)` rows for several intersections.
    pub async fn volume_rows_for(
        pool: &PgPool,
        intersection_ids: &[DbId],
        since: Timestamp,
    ) -> Result<Vec<(DbId, String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, String, i64)>(
            "SELECT s.intersection_id, c.vehicle_class, COUNT(*)
             FROM crossings c
             JOIN semaphores s ON s.id = c.semaphore_id
             WHERE s.intersection_id = ANY($1) AND c.crossed_at >= $2
             GROUP BY s.intersection_id, c.vehicle_class",
        )
        .bind(intersection_ids)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Every semaphore of the intersection with its latest color.
    ///
    /// One query: the newest `color_changes` row per semaphore is joined
    /// laterally. Semaphores without history report [`DEFAULT_COLOR`].
    pub async fn semaphore_status(
        pool: &PgPool,
        intersection_id: DbId,
    ) -> Result<Vec<SemaphoreStatus>, sqlx::Error> {
        sqlx::query_as::<_, SemaphoreStatus>(
            "SELECT s.id, s.kind, s.street, s.sense,
                    COALESCE(latest.color, $2) AS current_color
             FROM semaphores s
             LEFT JOIN LATERAL (
                 SELECT cc.color FROM color_changes cc
                 WHERE cc.semaphore_id = s.id
                 ORDER BY cc.changed_at DESC, cc.id DESC
                 LIMIT 1
             ) latest ON TRUE
             WHERE s.intersection_id = $1
             ORDER BY s.id",
        )
        .bind(intersection_id)
        .bind(DEFAULT_COLOR)
        .fetch_all(pool)
        .await
    }

    /// Stops at the intersection's stations with `expected_arrival >= since`,
    /// earliest first.
    pub async fn schedule(
        pool: &PgPool,
        intersection_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ScheduleEntry>, sqlx::Error> {
        let mut entries = sqlx::query_as::<_, ScheduleEntry>(
            "SELECT v.vehicle_class, v.line, v.reg_nr AS reg_number,
                    st.name AS station_name, sp.expected_arrival, sp.actual_arrival,
                    sp.stopped_minutes
             FROM stops sp
             JOIN stations st ON st.id = sp.station_id
             JOIN vehicles v ON v.id = sp.vehicle_id
             WHERE st.intersection_id = $1 AND sp.expected_arrival >= $2
             ORDER BY sp.expected_arrival ASC, sp.id ASC",
        )
        .bind(intersection_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        for entry in &mut entries {
            entry.delayed = schedule::is_delayed(entry.stopped_minutes);
        }
        Ok(entries)
    }

    /// `(minute, vehicle class, count)` rows at the intersection since `since`.
    pub async fn flow_rows(
        pool: &PgPool,
        intersection_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<(Timestamp, String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (Timestamp, String, i64)>(
            "SELECT date_trunc('minute', c.crossed_at) AS minute, c.vehicle_class, COUNT(*)
             FROM crossings c
             JOIN semaphores s ON s.id = c.semaphore_id
             WHERE s.intersection_id = $1 AND c.crossed_at >= $2
             GROUP BY minute, c.vehicle_class",
        )
        .bind(intersection_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Activity summary of the intersection for one UTC calendar day.
    pub async fn history(
        pool: &PgPool,
        intersection_id: DbId,
        date: NaiveDate,
    ) -> Result<HistorySummary, sqlx::Error> {
        let (start, end) = timeline::day_bounds(date);

        let hourly = sqlx::query_as::<_, (i32, i64)>(
            "SELECT EXTRACT(HOUR FROM c.crossed_at AT TIME ZONE 'UTC')::INT AS hour, COUNT(*)
             FROM crossings c
             JOIN semaphores s ON s.id = c.semaphore_id
             WHERE s.intersection_id = $1 AND c.crossed_at >= $2 AND c.crossed_at < $3
             GROUP BY hour",
        )
        .bind(intersection_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        let query = format!(
            "SELECT c.vehicle_class, COUNT(*)
             FROM crossings c
             JOIN semaphores s ON s.id = c.semaphore_id
             WHERE s.intersection_id = $1 AND c.crossed_at >= $2 AND c.crossed_at < $3
               AND {}
             GROUP BY c.vehicle_class",
            color_at_crossing_is(4)
        );
        let violation_rows = sqlx::query_as::<_, (String, i64)>(&query)
            .bind(intersection_id)
            .bind(start)
            .bind(end)
            .bind(VIOLATION_COLOR)
            .fetch_all(pool)
            .await?;

        let violations_by_type = VolumeCounts::from_rows(
            violation_rows.iter().map(|(class, n)| (class.as_str(), *n)),
        );
        let hourly_activity: Vec<HourlyCount> = timeline::hourly_buckets(hourly);
        let total_vehicles = hourly_activity.iter().map(|h| h.count).sum();

        Ok(HistorySummary {
            date: date.format("%Y-%m-%d").to_string(),
            violations: violations_by_type.total,
            violations_by_type,
            total_vehicles,
            hourly_activity,
        })
    }
}
