//! Tests for the buffered overlap rule.

use chrono::{TimeZone, Utc};
use slot_engine::conflict::{find_booking_conflicts, overlaps, Interval};
use slot_engine::schedule::{BookingStatus, CommittedBooking};

/// Helper to build an interval from hour/minute pairs on 2026-03-17 (UTC).
fn interval(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Interval {
    Interval::new(
        Utc.with_ymd_and_hms(2026, 3, 17, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 17, end_hour, end_min, 0)
            .unwrap(),
    )
}

fn booking(
    id: &str,
    span: Interval,
    status: BookingStatus,
    buffer_minutes: u32,
) -> CommittedBooking {
    CommittedBooking {
        id: Some(id.to_string()),
        scheduled_start: span.start,
        scheduled_end: span.end,
        status,
        buffer_minutes,
    }
}

#[test]
fn back_to_back_without_buffers_is_allowed() {
    // 09:00-10:00 then 10:00-11:00
    let a = interval(9, 0, 10, 0);
    let b = interval(10, 0, 11, 0);

    assert!(!overlaps(&a, 0, &b, 0));
    assert!(!overlaps(&b, 0, &a, 0));
}

#[test]
fn plain_overlap_is_detected() {
    let a = interval(9, 0, 10, 0);
    let b = interval(9, 30, 10, 30);

    assert!(overlaps(&a, 0, &b, 0));
}

#[test]
fn candidate_buffer_alone_forces_a_gap() {
    let candidate = interval(10, 0, 11, 0);
    let committed = interval(9, 0, 10, 0);

    assert!(overlaps(&candidate, 10, &committed, 0));
}

#[test]
fn committed_buffer_alone_forces_a_gap() {
    let candidate = interval(10, 0, 11, 0);
    let committed = interval(9, 0, 10, 0);

    assert!(overlaps(&candidate, 0, &committed, 10));
}

#[test]
fn both_buffers_must_fit_in_the_gap() {
    // Each side is widened by its own buffer, so the gap required between the
    // two sessions is the sum of both buffers. Here the gap is 20 minutes:
    // 10 + 10 just fits, 15 + 15 does not, and one side alone at 25 does not.
    let candidate = interval(10, 20, 11, 0);
    let committed = interval(9, 0, 10, 0);

    assert!(!overlaps(&candidate, 10, &committed, 10));
    assert!(overlaps(&candidate, 25, &committed, 0));
    assert!(overlaps(&candidate, 0, &committed, 25));
    assert!(overlaps(&candidate, 15, &committed, 15));
}

#[test]
fn buffered_edges_touching_do_not_overlap() {
    // 09:00-09:30 +15 → ends 09:45; 10:00-10:30 -15 → starts 09:45.
    let candidate = interval(9, 0, 9, 30);
    let committed = interval(10, 0, 10, 30);

    assert!(!overlaps(&candidate, 15, &committed, 0));
    assert!(!overlaps(&candidate, 0, &committed, 15));
    assert!(overlaps(&candidate, 15, &committed, 16));
}

#[test]
fn fully_contained_interval_overlaps() {
    let outer = interval(9, 0, 12, 0);
    let inner = interval(10, 0, 11, 0);

    assert!(overlaps(&outer, 0, &inner, 0));
    assert!(overlaps(&inner, 0, &outer, 0));
}

// ── find_booking_conflicts ──────────────────────────────────────────────────

#[test]
fn cancelled_and_completed_bookings_never_conflict() {
    let span = interval(10, 0, 11, 0);
    let bookings = vec![
        booking("c", span, BookingStatus::Cancelled, 30),
        booking("d", span, BookingStatus::Completed, 30),
    ];

    let conflicts = find_booking_conflicts(&span, 0, &bookings, None);

    assert!(conflicts.is_empty());
}

#[test]
fn requested_and_confirmed_bookings_conflict_with_buffered_overlap() {
    let candidate = interval(10, 0, 11, 0);
    let bookings = vec![
        booking("r", interval(10, 30, 11, 30), BookingStatus::Requested, 0),
        booking("k", interval(11, 0, 12, 0), BookingStatus::Confirmed, 15),
        booking("far", interval(14, 0, 15, 0), BookingStatus::Confirmed, 15),
    ];

    let conflicts = find_booking_conflicts(&candidate, 0, &bookings, None);

    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].booking.id.as_deref(), Some("r"));
    assert_eq!(conflicts[0].overlap_minutes, 30);
    // 10:00-11:00 vs 10:45-12:15
    assert_eq!(conflicts[1].booking.id.as_deref(), Some("k"));
    assert_eq!(conflicts[1].overlap_minutes, 15);
}

#[test]
fn excluded_booking_is_ignored() {
    let span = interval(10, 0, 11, 0);
    let bookings = vec![booking("moving", span, BookingStatus::Confirmed, 0)];

    assert_eq!(find_booking_conflicts(&span, 0, &bookings, None).len(), 1);
    assert!(find_booking_conflicts(&span, 0, &bookings, Some("moving")).is_empty());
    assert_eq!(
        find_booking_conflicts(&span, 0, &bookings, Some("other")).len(),
        1
    );
}

#[test]
fn booking_without_id_is_never_excluded() {
    let span = interval(10, 0, 11, 0);
    let bookings = vec![CommittedBooking {
        id: None,
        scheduled_start: span.start,
        scheduled_end: span.end,
        status: BookingStatus::Confirmed,
        buffer_minutes: 0,
    }];

    assert_eq!(find_booking_conflicts(&span, 0, &bookings, Some("x")).len(), 1);
}
