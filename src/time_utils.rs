// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting and daily boundaries.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar date ("YYYY-MM-DD") read off the timestamp's own wall clock.
///
/// Callers that want the household's local date must convert with
/// `with_timezone` first; a UTC timestamp yields the UTC date.
pub fn local_date_string<Tz: TimeZone>(now: DateTime<Tz>) -> String {
    format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day())
}

/// Duration from `now` until the next local midnight.
pub fn until_next_midnight<Tz: TimeZone>(now: DateTime<Tz>) -> std::time::Duration {
    let tomorrow = now.date_naive() + ChronoDuration::days(1);
    let next_midnight = tomorrow.and_hms_opt(0, 0, 0).expect("midnight is valid");
    let remaining = next_midnight - now.naive_local();
    remaining.to_std().unwrap_or(std::time::Duration::ZERO)
}
