//! Shared query and path parameter parsing for API handlers.
//!
//! Numeric query parameters are taken as raw strings so that a malformed
//! value falls back to its default instead of rejecting the request.

use chrono::NaiveDate;
use flower_core::timeline;
use flower_core::types::DbId;
use serde::Deserialize;

use crate::error::AppError;

/// Upper bound for `?limit=` on report listings.
pub const MAX_REPORT_LIMIT: i64 = 500;
/// Used when `?limit=` is missing or malformed.
pub const DEFAULT_REPORT_LIMIT: i64 = 50;

/// `?days=N` look-back window.
#[derive(Debug, Default, Deserialize)]
pub struct DaysParams {
    pub days: Option<String>,
}

impl DaysParams {
    pub fn days(&self) -> i64 {
        timeline::resolve_days(self.days.as_deref())
    }
}

/// `?days=N&limit=M` for report listings.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub days: Option<String>,
    pub limit: Option<String>,
}

impl ReportParams {
    pub fn days(&self) -> i64 {
        timeline::resolve_days(self.days.as_deref())
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_REPORT_LIMIT)
            .clamp(1, MAX_REPORT_LIMIT)
    }
}

/// `?minutes=N` for the live flow chart.
#[derive(Debug, Default, Deserialize)]
pub struct MinutesParams {
    pub minutes: Option<String>,
}

impl MinutesParams {
    pub fn minutes(&self) -> i64 {
        timeline::resolve_minutes(self.minutes.as_deref())
    }
}

/// `?date=YYYY-MM-DD` for the history view.
#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

impl DateParams {
    /// The requested date; missing or malformed is a 400.
    pub fn date(&self) -> Result<NaiveDate, AppError> {
        let raw = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("Date parameter is required (YYYY-MM-DD)".into())
            })?;
        parse_date(raw)
    }
}

/// Parse a `YYYY-MM-DD` date, mapping failure to a 400.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Parse an intersection id path segment: a positive integer, else 400.
pub fn parse_intersection_id(raw: &str) -> Result<DbId, AppError> {
    raw.trim()
        .parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Invalid intersection id".into()))
}

/// Parse a comma-separated id list, skipping anything that is not a
/// positive integer. Duplicates are removed; order is preserved.
pub fn parse_id_list(raw: &str) -> Vec<DbId> {
    let mut ids: Vec<DbId> = Vec::new();
    for id in raw
        .split(',')
        .filter_map(|s| s.trim().parse::<DbId>().ok())
        .filter(|id| *id > 0)
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
