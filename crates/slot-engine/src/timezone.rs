//! Wall-clock ↔ UTC conversion across IANA timezones.
//!
//! Offsets are resolved per instant through `chrono-tz`, never cached per zone,
//! so every conversion sees the DST rules in force on its own date.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::schedule::{format_wall_clock, parse_wall_clock};

/// A calendar date and `"HH:mm"` time as seen on a wall clock in some zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallClock {
    pub date: NaiveDate,
    pub time: String,
}

/// Parse an IANA timezone identifier.
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` for identifiers unknown to the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// Parse a `"YYYY-MM-DD"` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(s.to_string()))
}

/// Render a UTC instant as a wall clock in `timezone`.
pub fn localize(instant: DateTime<Utc>, timezone: &str) -> Result<WallClock> {
    Ok(localize_in(instant, parse_timezone(timezone)?))
}

/// Render a UTC instant as a wall clock in an already-parsed zone.
pub fn localize_in(instant: DateTime<Utc>, tz: Tz) -> WallClock {
    let local = instant.with_timezone(&tz).naive_local();
    WallClock {
        date: local.date(),
        time: local.format("%H:%M").to_string(),
    }
}

/// Interpret `"HH:mm"` on `date` as wall-clock time in `timezone` and return
/// the absolute instant.
///
/// Ambiguous and nonexistent times both resolve to the earlier valid instant:
/// a time in a spring-forward gap is read with the post-transition offset.
///
/// # Errors
/// `InvalidTimezone` for an unknown zone, `InvalidTime` for a malformed time.
pub fn to_utc(date: NaiveDate, wall_clock: &str, timezone: &str) -> Result<DateTime<Utc>> {
    let tz = parse_timezone(timezone)?;
    let minute = parse_wall_clock(wall_clock)
        .ok_or_else(|| EngineError::InvalidTime(wall_clock.to_string()))?;
    resolve_local(date, minute, tz, DstPolicy::ShiftBackward)
        .ok_or_else(|| EngineError::InvalidTime(wall_clock.to_string()))
}

/// Convert a wall-clock time on `date` from one zone to another.
pub fn convert_wall_clock(
    date: NaiveDate,
    wall_clock: &str,
    from_timezone: &str,
    to_timezone: &str,
) -> Result<WallClock> {
    let to_tz = parse_timezone(to_timezone)?;
    let instant = to_utc(date, wall_clock, from_timezone)?;
    Ok(localize_in(instant, to_tz))
}

/// Resolve a minute-of-day on `date` in `tz` to a UTC instant.
///
/// `minute_of_day` may equal 1440, meaning midnight at the end of `date`.
/// Returns `None` only when the time falls in a DST gap and `policy` is
/// [`DstPolicy::Skip`].
pub fn resolve_local(
    date: NaiveDate,
    minute_of_day: u32,
    tz: Tz,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute_of_day));

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => Some(across_gap(naive, tz, naive - Duration::days(1))),
            DstPolicy::ShiftBackward => Some(across_gap(naive, tz, naive + Duration::days(1))),
        },
    }
}

/// Interpret a gap time with the offset in force at `reference`.
///
/// A day either side of the gap is clear of it and of any neighbouring transition.
fn across_gap(naive: NaiveDateTime, tz: Tz, reference: NaiveDateTime) -> DateTime<Utc> {
    let offset_secs = tz.offset_from_utc_datetime(&reference).fix().local_minus_utc();
    let utc_naive = naive - Duration::seconds(i64::from(offset_secs));
    Utc.from_utc_datetime(&utc_naive)
}

/// Minute-of-day of an instant on a wall clock in `tz`.
pub(crate) fn minute_of_day_in(instant: DateTime<Utc>, tz: Tz) -> (NaiveDate, u32) {
    let local = instant.with_timezone(&tz).naive_local();
    (local.date(), local.hour() * 60 + local.minute())
}

/// Format a resolved instant's coach-local time; used in log fields.
pub(crate) fn describe(instant: DateTime<Utc>, tz: Tz) -> String {
    let (date, minute) = minute_of_day_in(instant, tz);
    format!("{} {}", date, format_wall_clock(minute))
}
