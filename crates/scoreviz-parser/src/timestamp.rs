use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::errors::RowError;

const DATE_FORMATS: &[&str] = &["%a %b %d %Y", "%b %d %Y", "%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M:%S", "%H:%M"];

/// Joins the raw `Date` and `Start (ET)` values the way the parser expects
/// them: `"{date},{time}"`. A bare `a`/`p` meridiem is widened to `AM`/`PM`.
pub fn combine(date: &str, time: &str) -> String {
    format!("{},{}", date.trim(), normalize_time(time))
}

fn normalize_time(time: &str) -> String {
    let mut upper = time.trim().to_ascii_uppercase();
    if upper.ends_with('A') || upper.ends_with('P') {
        upper.push('M');
    }
    upper
}

/// Parses a combined date/time string as wall-clock time in `timezone` and
/// returns epoch milliseconds. An empty time component means midnight.
pub fn parse_combined(combined: &str, timezone: Tz) -> Result<i64, RowError> {
    let naive = parse_naive(combined).ok_or_else(|| RowError::Timestamp {
        value: combined.to_string(),
    })?;

    let local = timezone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| RowError::NonexistentLocalTime {
            value: combined.to_string(),
            timezone: timezone.name().to_string(),
        })?;

    match local.timestamp_millis() {
        0 => Err(RowError::InvalidInstant {
            value: combined.to_string(),
        }),
        millis => Ok(millis),
    }
}

/// Derives the timestamp for a record's `date` and `time` fields. A field
/// that never had a column is not a usable value, unlike an empty cell.
pub fn derive_timestamp(
    date: Option<&str>,
    time: Option<&str>,
    timezone: Tz,
) -> Result<i64, RowError> {
    match (date, time) {
        (Some(date), Some(time)) => parse_combined(&combine(date, time), timezone),
        _ => Err(RowError::MissingColumn {
            column: if date.is_none() { "date" } else { "time" },
        }),
    }
}

fn parse_naive(combined: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = combined.rsplit_once(',')?;
    if date_part.is_empty() {
        return None;
    }

    if time_part.is_empty() {
        return DATE_FORMATS.iter().find_map(|date_fmt| {
            NaiveDate::parse_from_str(date_part, date_fmt)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });
    }

    DATE_FORMATS.iter().find_map(|date_fmt| {
        TIME_FORMATS.iter().find_map(|time_fmt| {
            let fmt = format!("{date_fmt},{time_fmt}");
            NaiveDateTime::parse_from_str(combined, &fmt).ok()
        })
    })
}
