//! # slot-engine
//!
//! Availability and slot resolution for coaching schedules.
//!
//! Turns a coach's weekly schedule, per-date overrides, buffer rules and the
//! current booking snapshot into bookable, conflict-free, timezone-correct
//! slots, and maps a viewer's local selection back to the absolute instants that
//! get stored. Every function is a pure computation over borrowed inputs.
//!
//! ## Modules
//!
//! - [`availability`]: Weekly rule + override precedence → effective window per date
//! - [`slots`]: Effective window + bookings → ordered bookable start times
//! - [`conflict`]: Buffered overlap rule between a candidate and committed bookings
//! - [`timezone`]: Wall-clock ↔ UTC conversion across IANA zones
//! - [`localizer`]: Coach-local slots ↔ viewer-local display and booking windows
//! - [`engine`]: `SlotQuery` facade and commit-time re-validation
//! - [`schedule`]: Data model shared by all of the above
//! - [`config`]: Slot generation settings
//! - [`dst`]: DST gap policies
//! - [`error`]: Error types

pub mod availability;
pub mod config;
pub mod conflict;
pub mod dst;
pub mod engine;
pub mod error;
pub mod localizer;
pub mod schedule;
pub mod slots;
pub mod timezone;

pub use availability::{resolve, DayAvailability, EffectiveWindow, WeeklySchedule};
pub use config::SlotConfig;
pub use conflict::{find_booking_conflicts, overlaps, Interval};
pub use dst::DstPolicy;
pub use engine::{revalidate_selection, CoachSchedule, DaySlots, SlotQuery};
pub use error::EngineError;
pub use localizer::{from_viewer_selection, to_viewer_timezone, BookingWindow, ViewerSlot};
pub use schedule::{
    AvailabilityOverride, BookingStatus, CommittedBooking, Offering, SessionLength,
    WeeklyAvailabilityRule,
};
pub use slots::{generate, CandidateSlot};
pub use timezone::{localize, to_utc, WallClock};
