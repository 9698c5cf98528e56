//! Present coach-local slots in a viewer's timezone and map a viewer's
//! selection back to absolute time.
//!
//! Results always carry a calendar date alongside the time: a slot near
//! midnight in the coach's zone can fall on a different date for the viewer.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::slots::CandidateSlot;
use crate::timezone::{localize_in, parse_timezone, to_utc, WallClock};

/// The absolute `(start, end)` pair handed to the booking create/reschedule call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindow {
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn new(scheduled_start: DateTime<Utc>, session_minutes: u32) -> Self {
        Self {
            scheduled_start,
            scheduled_end: scheduled_start + Duration::minutes(i64::from(session_minutes)),
        }
    }
}

/// A candidate slot as displayed to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSlot {
    /// Wall clock in the viewer's zone.
    pub viewer: WallClock,
    /// Coach-local `"HH:mm"` the slot was generated as.
    pub coach_time: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Show coach-local `slot` on `date` as it reads in `viewer_timezone`.
///
/// # Errors
/// `InvalidTimezone` for either zone, `InvalidTime` for a malformed slot.
pub fn to_viewer_timezone(
    date: NaiveDate,
    slot: &str,
    coach_timezone: &str,
    viewer_timezone: &str,
) -> Result<WallClock> {
    let viewer_tz = parse_timezone(viewer_timezone)?;
    let instant = to_utc(date, slot, coach_timezone)?;
    Ok(localize_in(instant, viewer_tz))
}

/// Map a viewer's chosen wall-clock slot back to the instant it denotes.
///
/// This instant becomes the booking's `scheduledStart`.
pub fn from_viewer_selection(
    date: NaiveDate,
    slot: &str,
    viewer_timezone: &str,
) -> Result<DateTime<Utc>> {
    to_utc(date, slot, viewer_timezone)
}

/// Map a viewer selection to the full booking window for a session.
pub fn selection_to_booking_window(
    date: NaiveDate,
    slot: &str,
    viewer_timezone: &str,
    session_minutes: u32,
) -> Result<BookingWindow> {
    let start = from_viewer_selection(date, slot, viewer_timezone)?;
    Ok(BookingWindow::new(start, session_minutes))
}

/// Localize a batch of coach-local slot strings for one date.
pub fn localize_slots(
    date: NaiveDate,
    slots: &[String],
    coach_timezone: &str,
    viewer_timezone: &str,
) -> Result<Vec<WallClock>> {
    slots
        .iter()
        .map(|slot| to_viewer_timezone(date, slot, coach_timezone, viewer_timezone))
        .collect()
}

/// Localize already-resolved candidates for a viewer.
pub fn localize_candidates(slots: &[CandidateSlot], viewer_timezone: &str) -> Result<Vec<ViewerSlot>> {
    let viewer_tz = parse_timezone(viewer_timezone)?;
    Ok(slots
        .iter()
        .map(|slot| ViewerSlot {
            viewer: localize_in(slot.start, viewer_tz),
            coach_time: slot.start_time.clone(),
            start: slot.start,
            end: slot.end,
        })
        .collect())
}
