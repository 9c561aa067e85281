//! Time helpers — Unix-millisecond timestamps and business-timezone dates.
//!
//! Date → timestamp conversion happens at the API handler layer; the
//! engine and storage only ever see `i64` Unix millis.

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::{AppError, AppResult};

pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Current time as Unix milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Rounded minutes between two timestamps (`b - a`).
///
/// Can be negative; callers clamp to `>= 0` where elapsed/remaining
/// semantics apply.
pub fn minutes_between(a: i64, b: i64) -> i64 {
    ((b - a) as f64 / MILLIS_PER_MINUTE as f64).round() as i64
}

/// Minutes → milliseconds.
pub fn minutes_to_millis(minutes: i64) -> i64 {
    minutes * MILLIS_PER_MINUTE
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// Start of day (00:00:00) → Unix millis in the business timezone.
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// End of day → next day 00:00:00 Unix millis. Callers use `< end`.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// `YYYY-MM-DD` key for a timestamp in the business timezone.
pub fn local_date_key(millis: i64, tz: Tz) -> String {
    match tz.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            dt.format("%Y-%m-%d").to_string()
        }
        chrono::LocalResult::None => Utc
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}
