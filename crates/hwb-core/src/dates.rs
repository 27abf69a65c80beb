use chrono::{Local, NaiveDateTime, TimeZone};

use crate::{Error, Result};

pub const START_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a tracking start point into epoch seconds.
///
/// Accepts either raw epoch seconds or a local `YYYY-MM-DD HH:MM:SS` date.
pub fn parse_start_date(input: &str) -> Result<i64> {
    let s = input.trim();
    if let Ok(ts) = s.parse::<i64>() {
        if ts < 0 {
            return Err(Error::InvalidDate(format!("{s}: negative timestamp")));
        }
        return Ok(ts);
    }

    let naive = NaiveDateTime::parse_from_str(s, START_DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("{s}: {e}")))?;

    // DST gaps have no local representation; folds pick the earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| Error::InvalidDate(format!("{s}: not a valid local time")))
}
