//! Bookable slot generation for a single coach-local date.
//!
//! Candidates are laid on a fixed grid (30 minutes by default) inside the
//! effective window, resolved to absolute instants in the coach's timezone, and
//! dropped when their buffered interval collides with any blocking booking.
//! Comparing absolute instants keeps the result correct on DST transition days
//! and when the booking snapshot covers more than the query date.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};

use crate::availability::DayAvailability;
use crate::config::{SlotConfig, DEFAULT_GRANULARITY_MINUTES};
use crate::conflict::{overlaps, Interval};
use crate::dst::DstPolicy;
use crate::schedule::{format_wall_clock, CommittedBooking, SessionLength, MINUTES_PER_DAY};
use crate::timezone::{describe, minute_of_day_in, resolve_local};

/// A bookable slot on one date. Never persisted or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    pub date: NaiveDate,
    /// Coach-local `"HH:mm"`.
    pub start_time: String,
    /// Coach-local `"HH:mm"`; `"24:00"` when the session ends at midnight.
    pub end_time: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CandidateSlot {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// Coach-local start times (`"HH:mm"`) for `day` with the default grid.
///
/// Returns an empty list when the day is unavailable, the session does not fit
/// the window, or every grid position collides with a booking.
pub fn generate(
    day: &DayAvailability,
    bookings: &[CommittedBooking],
    session_minutes: u32,
    buffer_minutes: u32,
    timezone: Tz,
) -> Vec<String> {
    generate_candidates(
        day,
        bookings,
        SessionLength::new(session_minutes, buffer_minutes),
        timezone,
        None,
        &SlotConfig::default(),
    )
    .into_iter()
    .map(|slot| slot.start_time)
    .collect()
}

/// Full candidate slots for `day`.
///
/// `exclude_booking_id` removes one booking from the conflict set, which is how
/// a reschedule avoids colliding with the booking it is moving.
pub fn generate_candidates(
    day: &DayAvailability,
    bookings: &[CommittedBooking],
    session: SessionLength,
    timezone: Tz,
    exclude_booking_id: Option<&str>,
    config: &SlotConfig,
) -> Vec<CandidateSlot> {
    let Some(window) = day.window else {
        return Vec::new();
    };
    if session.duration_minutes == 0 {
        warn!(date = %day.date, "zero-length session requested, no slots generated");
        return Vec::new();
    }
    if session.duration_minutes > window.len_minutes() {
        return Vec::new();
    }

    let granularity = match config.granularity_minutes {
        0 => {
            warn!("slot granularity of 0 minutes is invalid, using default");
            DEFAULT_GRANULARITY_MINUTES
        }
        g => g,
    };

    let date = day.date;
    let (Some(day_start), Some(day_end), Some(close_at)) = (
        resolve_local(date, 0, timezone, DstPolicy::ShiftForward),
        resolve_local(date, MINUTES_PER_DAY, timezone, DstPolicy::ShiftForward),
        resolve_local(date, window.close, timezone, DstPolicy::ShiftForward),
    ) else {
        return Vec::new();
    };

    // Only bookings that can reach into this day matter.
    let day_span = Interval::new(day_start, day_end);
    let blocking: Vec<(Interval, u32)> = bookings
        .iter()
        .filter(|b| b.is_blocking() && !b.has_id(exclude_booking_id))
        .map(|b| (Interval::from(b), b.buffer_minutes))
        .filter(|(iv, buf)| overlaps(&day_span, session.buffer_minutes, iv, *buf))
        .collect();

    let first = window.open.div_ceil(granularity) * granularity;
    let last = window.close - session.duration_minutes;
    let duration = Duration::minutes(i64::from(session.duration_minutes));

    let mut slots = Vec::new();
    let mut previous_start: Option<DateTime<Utc>> = None;

    for minute in (first..=last).step_by(granularity as usize) {
        let Some(start) = resolve_local(date, minute, timezone, config.dst_policy) else {
            debug!(%date, minute, "candidate start falls in DST gap, skipped");
            continue;
        };
        // Shifted gap times can repeat or precede an instant already offered.
        if previous_start.is_some_and(|p| start <= p) {
            continue;
        }
        previous_start = Some(start);

        let end = start + duration;
        if end > close_at {
            continue;
        }

        let candidate = Interval::new(start, end);
        let collides = blocking
            .iter()
            .any(|(iv, buf)| overlaps(&candidate, session.buffer_minutes, iv, *buf));
        if collides {
            continue;
        }

        slots.push(CandidateSlot {
            date,
            start_time: wall_time_on(date, start, timezone),
            end_time: wall_time_on(date, end, timezone),
            start,
            end,
        });
    }

    debug!(
        %date,
        window_open = %window.start_time(),
        window_close = %window.end_time(),
        blocking = blocking.len(),
        slots = slots.len(),
        first_slot = ?slots.first().map(|s| describe(s.start, timezone)),
        "generated candidate slots"
    );

    slots
}

/// Coach-local `"HH:mm"` of `instant`, counted from midnight of `date` so that
/// the following midnight renders as `"24:00"`.
fn wall_time_on(date: NaiveDate, instant: DateTime<Utc>, tz: Tz) -> String {
    let (local_date, minute) = minute_of_day_in(instant, tz);
    if local_date > date {
        format_wall_clock(minute + MINUTES_PER_DAY)
    } else {
        format_wall_clock(minute)
    }
}
