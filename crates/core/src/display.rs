//! Human-readable formatting for listings and history.

use chrono::{DateTime, Utc};

/// Formats the distance between `then` and `now` as "3 days ago".
///
/// Months are 30 days and years 365 days. Anything under a minute,
/// including timestamps in the future, is "Just now".
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    let (value, unit) = if years > 0 {
        (years, "year")
    } else if months > 0 {
        (months, "month")
    } else if days > 0 {
        (days, "day")
    } else if hours > 0 {
        (hours, "hour")
    } else if minutes > 0 {
        (minutes, "minute")
    } else {
        return "Just now".to_owned();
    };

    let plural = if value > 1 { "s" } else { "" };
    format!("{value} {unit}{plural} ago")
}

/// Groups digits in thousands: `1234567` → `1,234,567`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
