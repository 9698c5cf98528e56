//! One entry point shared by new bookings, reschedules and the coach dashboard.
//!
//! A [`SlotQuery`] borrows the caller's schedule and booking snapshot, runs
//! resolution and generation on demand, and keeps nothing between calls. The
//! result reflects only the snapshot it was given: a slot that was free when
//! offered must be re-checked with [`revalidate_selection`] inside the write
//! that commits it.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::availability::{resolve_range, resolve_with_schedule, DayAvailability, WeeklySchedule};
use crate::config::SlotConfig;
use crate::conflict::{find_booking_conflicts, Interval};
use crate::error::{EngineError, Result};
use crate::localizer::{localize_candidates, BookingWindow, ViewerSlot};
use crate::schedule::{
    skip_malformed, AvailabilityOverride, CommittedBooking, SessionLength, WeeklyAvailabilityRule,
};
use crate::slots::{generate_candidates, CandidateSlot};
use crate::timezone::parse_timezone;

/// The availability portion of a coach profile.
///
/// `timezone` is required; there is no fallback zone inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachSchedule {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub weekly_rules: Vec<WeeklyAvailabilityRule>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub overrides: Vec<AvailabilityOverride>,
    pub timezone: String,
}

/// Candidate slots for one date of a range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<CandidateSlot>,
}

/// A slot query over one coach's schedule and booking snapshot.
#[derive(Debug, Clone)]
pub struct SlotQuery<'a> {
    overrides: &'a [AvailabilityOverride],
    weekly: WeeklySchedule,
    timezone: Tz,
    bookings: &'a [CommittedBooking],
    session: SessionLength,
    exclude_booking_id: Option<&'a str>,
    config: SlotConfig,
}

impl<'a> SlotQuery<'a> {
    /// Build a query. Fails only if the coach's timezone is unknown.
    pub fn new(
        schedule: &'a CoachSchedule,
        bookings: &'a [CommittedBooking],
        session: SessionLength,
    ) -> Result<Self> {
        Ok(Self {
            overrides: &schedule.overrides,
            weekly: WeeklySchedule::from_rules(&schedule.weekly_rules),
            timezone: parse_timezone(&schedule.timezone)?,
            bookings,
            session,
            exclude_booking_id: None,
            config: SlotConfig::default(),
        })
    }

    /// Ignore the booking with this id, e.g. the one being rescheduled.
    pub fn excluding(mut self, booking_id: &'a str) -> Self {
        self.exclude_booking_id = Some(booking_id);
        self
    }

    pub fn with_config(mut self, config: SlotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Effective availability for `date`.
    pub fn availability(&self, date: NaiveDate) -> DayAvailability {
        resolve_with_schedule(date, &self.weekly, self.overrides)
    }

    /// Bookable slots for `date`, coach-local.
    pub fn slots_for_date(&self, date: NaiveDate) -> Vec<CandidateSlot> {
        let day = self.availability(date);
        generate_candidates(
            &day,
            self.bookings,
            self.session,
            self.timezone,
            self.exclude_booking_id,
            &self.config,
        )
    }

    /// Bookable start times for `date` as coach-local `"HH:mm"` strings.
    pub fn slot_times(&self, date: NaiveDate) -> Vec<String> {
        self.slots_for_date(date)
            .into_iter()
            .map(|slot| slot.start_time)
            .collect()
    }

    /// Bookable slots for `date`, shown in `viewer_timezone`.
    pub fn slots_for_viewer(&self, date: NaiveDate, viewer_timezone: &str) -> Result<Vec<ViewerSlot>> {
        localize_candidates(&self.slots_for_date(date), viewer_timezone)
    }

    /// Bookable slots for every date in `from..=to`; dates without slots are kept
    /// with an empty list so a calendar can render them as closed.
    pub fn slots_for_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<DaySlots> {
        resolve_range(from, to, &self.weekly, self.overrides)
            .into_iter()
            .map(|day| DaySlots {
                date: day.date,
                slots: generate_candidates(
                    &day,
                    self.bookings,
                    self.session,
                    self.timezone,
                    self.exclude_booking_id,
                    &self.config,
                ),
            })
            .collect()
    }

    /// Re-check a chosen window against this query's booking set and buffer.
    pub fn revalidate(&self, window: &BookingWindow) -> Result<()> {
        revalidate_selection(
            window,
            self.session.buffer_minutes,
            self.bookings,
            self.exclude_booking_id,
        )
    }
}

/// Check a selected window against the live booking set just before commit.
///
/// # Errors
/// `SlotNoLongerAvailable` when any blocking booking now collides with the
/// window once both buffers are applied.
pub fn revalidate_selection(
    window: &BookingWindow,
    buffer_minutes: u32,
    live_bookings: &[CommittedBooking],
    exclude_booking_id: Option<&str>,
) -> Result<()> {
    let candidate = Interval::new(window.scheduled_start, window.scheduled_end);
    let conflicts = find_booking_conflicts(&candidate, buffer_minutes, live_bookings, exclude_booking_id);

    if conflicts.is_empty() {
        return Ok(());
    }

    warn!(
        start = %window.scheduled_start,
        conflicts = conflicts.len(),
        "selected slot collides with live bookings"
    );
    Err(EngineError::SlotNoLongerAvailable {
        start: window.scheduled_start,
        conflicts: conflicts.len(),
    })
}
