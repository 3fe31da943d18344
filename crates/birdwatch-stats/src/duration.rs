//! Human-readable duration formatting.
//!
//! Renders a time span as whole units, largest first, omitting units that
//! are zero: `"2 days 3 minutes"`, `"1 hour 1 second"`. A zero span renders
//! as `"0 seconds"`, never as an empty string.

use chrono::TimeDelta;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

/// Format a duration as `"<n> <unit>"` segments joined by single spaces.
///
/// The sign is ignored and sub-second precision is dropped. Units are
/// singular when the count is exactly one.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds().unsigned_abs();

    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    let mut parts: Vec<String> = [(days, "day"), (hours, "hour"), (minutes, "minute")]
        .into_iter()
        .filter(|&(count, _)| count > 0)
        .map(|(count, unit)| segment(count, unit))
        .collect();

    if seconds > 0 || parts.is_empty() {
        parts.push(segment(seconds, "second"));
    }

    parts.join(" ")
}

fn segment(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
