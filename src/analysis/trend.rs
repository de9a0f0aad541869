//! Seven-day activity trend.
//!
//! Days are bucketed in the time zone carried by the reference instant, so
//! callers control both "today" and the zone explicitly.

use crate::models::{DocumentRequest, Incident, TrendPoint};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use std::collections::HashMap;

/// Number of days covered by the trend, today included.
pub const TREND_DAYS: i64 = 7;

/// Build the daily incident/document counts for the week ending at `now`.
///
/// Always returns [`TREND_DAYS`] points, oldest first. Records whose
/// `createdAt` is missing or unparseable are left out.
pub fn build_seven_day_trend<Tz: TimeZone>(
    incidents: &[Incident],
    documents: &[DocumentRequest],
    now: &DateTime<Tz>,
) -> Vec<TrendPoint> {
    let today = now.date_naive();
    let zone = now.timezone();

    let mut points: Vec<TrendPoint> = (0..TREND_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            TrendPoint {
                date,
                label: date.format("%b %-d").to_string(),
                incident_count: 0,
                document_count: 0,
            }
        })
        .collect();

    let index: HashMap<NaiveDate, usize> = points
        .iter()
        .enumerate()
        .map(|(i, point)| (point.date, i))
        .collect();

    for day in incidents
        .iter()
        .filter_map(|i| created_on(i.created_at.as_deref(), &zone))
    {
        if let Some(&i) = index.get(&day) {
            points[i].incident_count += 1;
        }
    }

    for day in documents
        .iter()
        .filter_map(|d| created_on(d.created_at.as_deref(), &zone))
    {
        if let Some(&i) = index.get(&day) {
            points[i].document_count += 1;
        }
    }

    points
}

/// Resolve a `createdAt` value to its calendar day in `zone`.
///
/// Timestamps with an offset are converted into `zone`. Timestamps without
/// one are taken as already local, and anything else falls back to the
/// date part before the `T` or space separator.
pub fn created_on<Tz: TimeZone>(created_at: Option<&str>, zone: &Tz) -> Option<NaiveDate> {
    let raw = created_at?.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(zone).date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.date());
        }
    }

    let date_part = raw.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
