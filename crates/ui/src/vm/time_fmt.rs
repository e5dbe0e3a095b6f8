use chrono::{DateTime, NaiveDate, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    if value == DateTime::<Utc>::UNIX_EPOCH {
        return "unknown".to_string();
    }
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Short axis label, e.g. `Mar 01`.
#[must_use]
pub fn format_day(value: NaiveDate) -> String {
    value.format("%b %d").to_string()
}

/// `m:ss`, or `h:mm:ss` past the hour.
#[must_use]
pub fn format_duration(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
