// Wall-clock normalization
//
// Activity logs carry sleep and wake timestamps in whatever form the API
// stored them. Scoring only looks at the hour and minute as the devotee saw
// them on the wall, so the date component is discarded here.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};

/// Hours below this value on a sleep timestamp belong to the following night.
pub const SLEEP_ROLLOVER_HOUR: u32 = 12;

const DATE_TIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Extract the wall-clock time from a raw timestamp.
///
/// RFC 3339 values keep the time in their recorded offset, naive date-times
/// and bare `HH:MM[:SS]` values are taken as-is. Returns `None` for anything
/// else.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.time());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.time());
        }
    }

    for format in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(raw, format) {
            return Some(t);
        }
    }

    None
}

/// Minutes since midnight, seconds discarded.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Minutes on a continuous evening-to-early-morning scale.
///
/// Times before noon are pushed past 24:00 so that 00:30 reads as 24:30.
/// An afternoon nap logged as a sleep time therefore looks like an early
/// bedtime.
pub fn sleep_scale_minutes(time: NaiveTime) -> u32 {
    let hour = if time.hour() < SLEEP_ROLLOVER_HOUR { time.hour() + 24 } else { time.hour() };
    hour * 60 + time.minute()
}
