//! Timestamp formatting for issue entries

use chrono::{DateTime, Utc};

/// Formats a timestamp relative to `now`
///
/// Produces "from now" phrases such as "a few seconds ago", "3 hours ago"
/// or "2 years ago". Thresholds round to the nearest unit and switch to the
/// next unit early (45 minutes already reads as "an hour ago"). Future
/// timestamps are treated as present.
///
/// # Arguments
///
/// * `timestamp`: Moment to describe
/// * `now`: Reference moment
///
/// # Returns
///
/// Human readable relative time string
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // Clock skew between upstream and this host can put updates in the future
    let secs = (now - timestamp).num_seconds().max(0) as f64;
    let minutes = secs / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let months = days / 30.4;
    let years = days / 365.0;

    if secs < 45.0 {
        "a few seconds ago".to_string()
    } else if secs < 90.0 {
        "a minute ago".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes ago", minutes.round())
    } else if minutes < 90.0 {
        "an hour ago".to_string()
    } else if hours < 22.0 {
        format!("{} hours ago", hours.round())
    } else if hours < 36.0 {
        "a day ago".to_string()
    } else if days < 26.0 {
        format!("{} days ago", days.round())
    } else if days < 46.0 {
        "a month ago".to_string()
    } else if days < 320.0 {
        format!("{} months ago", months.round().max(2.0))
    } else if days < 548.0 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", years.round().max(2.0))
    }
}

/// Formats a timestamp as `YYYY-MM-DD` in UTC
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}
