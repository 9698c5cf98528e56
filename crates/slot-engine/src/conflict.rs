//! Buffered overlap rule between a candidate slot and committed bookings.
//!
//! Each side is widened by its own buffer before the half-open overlap test, so a
//! buffer on either party forces a gap while two zero-buffer bookings may sit
//! back to back. The policy itself ignores booking status; callers decide which
//! bookings are relevant.

use chrono::{DateTime, Duration, Utc};

use crate::schedule::CommittedBooking;

/// A half-open `[start, end)` span of absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Widen by `buffer_minutes` on both sides.
    pub fn expand(&self, buffer_minutes: u32) -> Self {
        let pad = Duration::minutes(i64::from(buffer_minutes));
        Self {
            start: self.start - pad,
            end: self.end + pad,
        }
    }

    /// Standard half-open overlap; touching endpoints do not overlap.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<&CommittedBooking> for Interval {
    fn from(b: &CommittedBooking) -> Self {
        Interval::new(b.scheduled_start, b.scheduled_end)
    }
}

/// Whether `candidate` (with its buffer) collides with `committed` (with its own).
pub fn overlaps(
    candidate: &Interval,
    candidate_buffer: u32,
    committed: &Interval,
    committed_buffer: u32,
) -> bool {
    candidate
        .expand(candidate_buffer)
        .intersects(&committed.expand(committed_buffer))
}

/// A committed booking that blocks a candidate interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConflict {
    pub booking: CommittedBooking,
    /// Overlap of the two buffered intervals.
    pub overlap_minutes: i64,
}

/// Find every blocking booking that collides with `candidate`.
///
/// Only `requested` and `confirmed` bookings are considered, and a booking whose
/// id equals `exclude_id` (the booking being rescheduled) is skipped.
pub fn find_booking_conflicts(
    candidate: &Interval,
    candidate_buffer: u32,
    bookings: &[CommittedBooking],
    exclude_id: Option<&str>,
) -> Vec<BookingConflict> {
    let padded = candidate.expand(candidate_buffer);

    bookings
        .iter()
        .filter(|b| b.is_blocking() && !b.has_id(exclude_id))
        .filter_map(|b| {
            let other = Interval::from(b).expand(b.buffer_minutes);
            if !padded.intersects(&other) {
                return None;
            }
            let overlap_start = padded.start.max(other.start);
            let overlap_end = padded.end.min(other.end);
            Some(BookingConflict {
                booking: b.clone(),
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            })
        })
        .collect()
}
