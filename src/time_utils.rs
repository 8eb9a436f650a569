// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting, parsing and day bucketing.

use crate::models::DayKey;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Postgres `timestamptz` text output, e.g. `2024-06-01 10:00:00.123+00`.
const POSTGRES_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp into an instant.
///
/// Returns `None` for anything unparseable; callers treat that as the
/// lowest possible sort key rather than an error.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DateTime::parse_from_str(raw, POSTGRES_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar day of `instant` on the wall clock of `tz`.
pub fn day_key<Tz: TimeZone>(instant: Option<DateTime<Utc>>, tz: &Tz) -> DayKey {
    match instant {
        Some(at) => DayKey::Date(at.with_timezone(tz).date_naive()),
        None => DayKey::Unknown,
    }
}
