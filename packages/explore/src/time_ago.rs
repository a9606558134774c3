//! Relative-age labels for report timestamps.

use chrono::{DateTime, Utc};

/// Formats how long ago `timestamp` was, relative to `now`.
///
/// Uses the largest whole unit out of days, hours and minutes, e.g.
/// `"3 days ago"`, `"1 hour ago"`, `"5 mins ago"`. Anything under a minute,
/// and any timestamp after `now`, is `"Just now"`.
#[must_use]
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);

    let days = elapsed.num_days();
    if days > 0 {
        return plural(days, "day");
    }

    let hours = elapsed.num_hours();
    if hours > 0 {
        return plural(hours, "hour");
    }

    let minutes = elapsed.num_minutes();
    if minutes > 0 {
        return plural(minutes, "min");
    }

    "Just now".to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
