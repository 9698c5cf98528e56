//! Schedule data model: weekly rules, date overrides, committed bookings, offerings.
//!
//! Field names serialize in camelCase so records read from the coach and booking
//! documents deserialize without a mapping layer. Wall-clock times stay as raw
//! `"HH:mm"` strings; they are validated lazily by the resolver so that a single
//! malformed record degrades that day to "not available" instead of rejecting the
//! whole document.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Minutes in a day; also the minute-of-day value of an `"24:00"` close time.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Recurring availability for one day of the week, in the coach's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAvailabilityRule {
    /// 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// Required only when `is_available` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub is_available: bool,
}

/// Date-specific availability that fully replaces the weekly rule for `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityOverride {
    /// Coach-local calendar date.
    pub date: NaiveDate,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Booking lifecycle status, owned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status still occupies time.
    pub fn is_blocking(self) -> bool {
        matches!(self, BookingStatus::Requested | BookingStatus::Confirmed)
    }
}

/// An existing reservation consulted for conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedBooking {
    /// Document id; lets a reschedule exclude the booking being moved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(default)]
    pub buffer_minutes: u32,
}

impl CommittedBooking {
    pub fn is_blocking(&self) -> bool {
        self.status.is_blocking()
    }

    pub(crate) fn has_id(&self, id: Option<&str>) -> bool {
        matches!((self.id.as_deref(), id), (Some(a), Some(b)) if a == b)
    }
}

/// Session length and required gap fed into slot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLength {
    pub duration_minutes: u32,
    #[serde(default)]
    pub buffer_minutes: u32,
}

impl SessionLength {
    pub fn new(duration_minutes: u32, buffer_minutes: u32) -> Self {
        Self {
            duration_minutes,
            buffer_minutes,
        }
    }
}

/// A named offering from the coach profile, consumed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub buffer_minutes: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Offering {
    /// The session length this offering books, or `None` when it is inactive.
    pub fn session(&self) -> Option<SessionLength> {
        self.is_active
            .then(|| SessionLength::new(self.duration_minutes, self.buffer_minutes))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Record<T> {
    Valid(T),
    Malformed(IgnoredAny),
}

/// Deserialize a record list, dropping entries that do not fit `T`.
///
/// One impossible date or mistyped field costs that record only, never the
/// whole coach document.
pub(crate) fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let records = Vec::<Record<T>>::deserialize(deserializer)?;
    let total = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter_map(|r| match r {
            Record::Valid(v) => Some(v),
            Record::Malformed(IgnoredAny) => None,
        })
        .collect();

    if kept.len() < total {
        warn!(
            dropped = total - kept.len(),
            kind = std::any::type_name::<T>(),
            "skipping malformed schedule records"
        );
    }
    Ok(kept)
}

/// Parse `"HH:mm"` into minutes since midnight.
///
/// `"24:00"` is accepted and maps to [`MINUTES_PER_DAY`] so a window can close
/// at midnight. Anything else that is not a valid 24-hour time yields `None`.
pub fn parse_wall_clock(s: &str) -> Option<u32> {
    let s = s.trim();
    if s == "24:00" {
        return Some(MINUTES_PER_DAY);
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .ok()
        .map(|t| t.hour() * 60 + t.minute())
}

/// Format minutes since midnight as zero-padded `"HH:mm"`.
pub fn format_wall_clock(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}
