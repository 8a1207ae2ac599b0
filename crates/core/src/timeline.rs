//! Time windows and zero-filled buckets for the aggregation read path.
//!
//! Queries return sparse `(bucket, class, count)` rows; the helpers here
//! resolve the window from query parameters and densify the rows so every
//! hour, minute, or day in the window is present in the response.

use std::collections::HashMap;

use chrono::{DateTime, Duration, DurationRound, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::types::Timestamp;
use crate::vehicle::{VehicleClass, VolumeCounts};

/// Look-back used when `?days=` is missing or not an integer.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;
/// Upper bound for `?days=`.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Look-back used when `?minutes=` is missing or not an integer.
pub const DEFAULT_FLOW_MINUTES: i64 = 20;
/// Upper bound for `?minutes=`.
pub const MAX_FLOW_MINUTES: i64 = 240;

/// Number of calendar days (today included) the history view may show.
pub const HISTORY_WINDOW_DAYS: i64 = 7;

/// Resolve the `days` query parameter: unparseable falls back to the default,
/// anything else is clamped into `1..=MAX_WINDOW_DAYS`.
pub fn resolve_days(raw: Option<&str>) -> i64 {
    resolve_bounded(raw, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS)
}

/// Resolve the `minutes` query parameter for the flow chart.
pub fn resolve_minutes(raw: Option<&str>) -> i64 {
    resolve_bounded(raw, DEFAULT_FLOW_MINUTES, MAX_FLOW_MINUTES)
}

fn resolve_bounded(raw: Option<&str>, default: i64, max: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default)
        .clamp(1, max)
}

/// Start of a look-back window of `days` ending at `now`.
pub fn window_start(now: Timestamp, days: i64) -> Timestamp {
    now - Duration::days(days)
}

/// `[midnight, next midnight)` in UTC for a calendar date.
pub fn day_bounds(date: NaiveDate) -> (Timestamp, Timestamp) {
    let start = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    (start, start + Duration::days(1))
}

/// Whether `date` is one of the last [`HISTORY_WINDOW_DAYS`] days ending today.
pub fn is_within_history_window(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today && date > today - Duration::days(HISTORY_WINDOW_DAYS)
}

/// The selectable history dates, oldest first, ending with `today`.
pub fn history_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..HISTORY_WINDOW_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

// ---------------------------------------------------------------------------
// Hourly buckets
// ---------------------------------------------------------------------------

/// Crossings observed during one hour of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    /// `"H:00"`, e.g. `"0:00"`, `"13:00"`.
    pub hour: String,
    pub count: i64,
}

/// Expand sparse `(hour, count)` rows into all 24 hours of the day.
///
/// Hours outside `0..24` are dropped.
pub fn hourly_buckets<I>(rows: I) -> Vec<HourlyCount>
where
    I: IntoIterator<Item = (i32, i64)>,
{
    let mut counts = [0i64; 24];
    for (hour, count) in rows {
        if let Ok(idx) = usize::try_from(hour) {
            if let Some(slot) = counts.get_mut(idx) {
                *slot += count;
            }
        }
    }
    counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourlyCount {
            hour: format!("{hour}:00"),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Minute buckets (live flow chart)
// ---------------------------------------------------------------------------

/// Per-class crossings in one minute, labelled `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowPoint {
    pub time: String,
    #[serde(flatten)]
    pub counts: VolumeCounts,
}

/// Truncate a timestamp to the start of its minute.
pub fn truncate_to_minute(ts: Timestamp) -> Timestamp {
    ts.duration_trunc(Duration::minutes(1)).unwrap_or(ts)
}

/// Build `minutes` consecutive minute buckets ending with the minute of `now`.
///
/// `rows` are `(minute start, vehicle class, count)`; rows falling outside the
/// window are ignored.
pub fn minute_buckets<'a, I>(now: Timestamp, minutes: i64, rows: I) -> Vec<FlowPoint>
where
    I: IntoIterator<Item = (Timestamp, &'a str, i64)>,
{
    let mut by_minute: HashMap<DateTime<Utc>, VolumeCounts> = HashMap::new();
    for (minute, class, count) in rows {
        if let Some(class) = VehicleClass::parse(class) {
            by_minute
                .entry(truncate_to_minute(minute))
                .or_default()
                .add(class, count);
        }
    }

    let last = truncate_to_minute(now);
    (0..minutes)
        .rev()
        .map(|offset| {
            let minute = last - Duration::minutes(offset);
            FlowPoint {
                time: format!("{:02}:{:02}", minute.hour(), minute.minute()),
                counts: by_minute.get(&minute).copied().unwrap_or_default(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Day buckets (analytics)
// ---------------------------------------------------------------------------

/// Per-class crossings on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCounts {
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(flatten)]
    pub counts: VolumeCounts,
}

/// Build `days` consecutive day buckets ending with `today`.
pub fn daily_buckets<'a, I>(today: NaiveDate, days: i64, rows: I) -> Vec<DailyCounts>
where
    I: IntoIterator<Item = (NaiveDate, &'a str, i64)>,
{
    let mut by_day: HashMap<NaiveDate, VolumeCounts> = HashMap::new();
    for (day, class, count) in rows {
        if let Some(class) = VehicleClass::parse(class) {
            by_day.entry(day).or_default().add(class, count);
        }
    }

    (0..days)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            DailyCounts {
                date: day.format("%Y-%m-%d").to_string(),
                counts: by_day.get(&day).copied().unwrap_or_default(),
            }
        })
        .collect()
}

/// Number of delayed stops on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDelays {
    pub date: String,
    pub delays: i64,
}

/// Build `days` consecutive delay buckets ending with `today`.
pub fn daily_delays<I>(today: NaiveDate, days: i64, rows: I) -> Vec<DailyDelays>
where
    I: IntoIterator<Item = (NaiveDate, i64)>,
{
    let by_day: HashMap<NaiveDate, i64> = rows.into_iter().collect();
    (0..days)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            DailyDelays {
                date: day.format("%Y-%m-%d").to_string(),
                delays: by_day.get(&day).copied().unwrap_or(0),
            }
        })
        .collect()
}
