use crate::error::TcxError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

pub const METERS_PER_MILE: f64 = 1609.344;

/// Parse a pace of the form `M:SS` or `MM:SS` into seconds per mile.
///
/// Both components must be plain non-negative integers; seconds must be
/// in 0-59.
pub fn pace_to_seconds_per_mile(pace: &str) -> Result<u32, TcxError> {
    let trimmed = pace.trim();
    let bad_format = || TcxError::InvalidPaceFormat {
        pace: trimmed.to_string(),
    };

    let Some((minutes, seconds)) = trimmed.split_once(':') else {
        return Err(bad_format());
    };

    let minutes: u32 = minutes.parse().map_err(|_| bad_format())?;
    let seconds: u32 = seconds.parse().map_err(|_| bad_format())?;

    if seconds > 59 {
        return Err(TcxError::InvalidPaceRange {
            pace: trimmed.to_string(),
        });
    }

    Ok(minutes * 60 + seconds)
}

/// Combine a local calendar date (`YYYY-MM-DD`), time of day (`HH:MM`) and a
/// fixed whole-hour UTC offset into an absolute UTC timestamp.
pub fn local_to_utc(date: &str, time: &str, offset_hours: i32) -> Result<DateTime<Utc>, TcxError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| TcxError::InvalidDateTime {
        value: date.to_string(),
    })?;
    let tod = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| TcxError::InvalidDateTime {
        value: time.to_string(),
    })?;

    if !(-23..=23).contains(&offset_hours) {
        return Err(TcxError::InvalidTimezoneOffset {
            hours: offset_hours,
        });
    }
    let offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
        TcxError::InvalidTimezoneOffset {
            hours: offset_hours,
        }
    })?;

    // A fixed offset has no DST gaps, so the local timestamp is unambiguous.
    let Some(local) = day.and_time(tod).and_local_timezone(offset).single() else {
        return Err(TcxError::InvalidDateTime {
            value: format!("{date}T{time}"),
        });
    };

    Ok(local.with_timezone(&Utc))
}

pub fn miles_to_meters(mi: f64) -> f64 {
    mi * METERS_PER_MILE
}

/// Timestamp format used everywhere in the TCX output.
pub fn format_utc(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
