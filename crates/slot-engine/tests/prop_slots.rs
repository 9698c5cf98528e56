//! Property-based tests for slot generation and timezone conversion.
//!
//! These hold for any well-formed window, session and booking set, not just the
//! hand-picked cases in `slot_tests.rs`.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use slot_engine::availability::{DayAvailability, EffectiveWindow};
use slot_engine::config::SlotConfig;
use slot_engine::conflict::{overlaps, Interval};
use slot_engine::schedule::{parse_wall_clock, BookingStatus, CommittedBooking, SessionLength};
use slot_engine::slots::generate_candidates;
use slot_engine::timezone::{localize, to_utc};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timezone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UTC".to_string()),
        Just("America/New_York".to_string()),
        Just("America/Los_Angeles".to_string()),
        Just("Europe/London".to_string()),
        Just("Asia/Tokyo".to_string()),
        Just("Asia/Kolkata".to_string()),
    ]
}

/// Window as (open, close) minutes, open < close, both on a 5 minute grid.
fn arb_window() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=276, 1u32..=288).prop_filter_map("open < close", |(a, b)| {
        let (open, close) = (a * 5, b * 5);
        (open < close).then_some((open, close))
    })
}

fn arb_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Requested),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::Completed),
        Just(BookingStatus::Cancelled),
    ]
}

/// Bookings on 2026-06-16 (UTC), 5 to 180 minutes long, buffer 0-60.
fn arb_bookings() -> impl Strategy<Value = Vec<CommittedBooking>> {
    prop::collection::vec(
        (0i64..288, 1i64..=36, 0u32..=60, arb_status()),
        0..6,
    )
    .prop_map(|raw| {
        let base = Utc.with_ymd_and_hms(2026, 6, 16, 0, 0, 0).unwrap();
        raw.into_iter()
            .map(|(start, len, buffer, status)| {
                let s = base + Duration::minutes(start * 5);
                CommittedBooking {
                    id: None,
                    scheduled_start: s,
                    scheduled_end: s + Duration::minutes(len * 5),
                    status,
                    buffer_minutes: buffer,
                }
            })
            .collect()
    })
}

fn day(open: u32, close: u32) -> DayAvailability {
    DayAvailability {
        date: NaiveDate::from_ymd_opt(2026, 6, 16).unwrap(),
        window: Some(EffectiveWindow { open, close }),
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Slots are aligned, inside the window, and ascending
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_aligned_and_fit_the_window(
        (open, close) in arb_window(),
        session in 5u32..=180,
        buffer in 0u32..=30,
    ) {
        let slots = generate_candidates(
            &day(open, close),
            &[],
            SessionLength::new(session, buffer),
            Tz::UTC,
            None,
            &SlotConfig::default(),
        );

        for slot in &slots {
            let start = parse_wall_clock(&slot.start_time).unwrap();
            prop_assert_eq!(start % 30, 0, "slot {} not on 30 minute grid", slot.start_time);
            prop_assert!(start >= open);
            prop_assert!(start + session <= close);
        }
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: No slot collides with a blocking booking
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_never_overlap_blocking_bookings(
        (open, close) in arb_window(),
        session in 5u32..=120,
        buffer in 0u32..=30,
        bookings in arb_bookings(),
    ) {
        let slots = generate_candidates(
            &day(open, close),
            &bookings,
            SessionLength::new(session, buffer),
            Tz::UTC,
            None,
            &SlotConfig::default(),
        );

        for slot in &slots {
            for b in bookings.iter().filter(|b| b.is_blocking()) {
                prop_assert!(
                    !overlaps(&slot.interval(), buffer, &Interval::from(b), b.buffer_minutes),
                    "slot {} collides with booking {:?}",
                    slot.start_time,
                    b
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Booking a generated slot removes it
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn booked_slot_is_no_longer_offered(
        (open, close) in arb_window(),
        session in 5u32..=120,
        buffer in 0u32..=30,
        pick in any::<prop::sample::Index>(),
    ) {
        let d = day(open, close);
        let length = SessionLength::new(session, buffer);
        let slots = generate_candidates(&d, &[], length, Tz::UTC, None, &SlotConfig::default());
        prop_assume!(!slots.is_empty());

        let chosen = &slots[pick.index(slots.len())];
        let booked = vec![CommittedBooking {
            id: None,
            scheduled_start: chosen.start,
            scheduled_end: chosen.end,
            status: BookingStatus::Confirmed,
            buffer_minutes: buffer,
        }];

        let after = generate_candidates(&d, &booked, length, Tz::UTC, None, &SlotConfig::default());
        prop_assert!(after.iter().all(|s| s.start != chosen.start));
    }
}

// ---------------------------------------------------------------------------
// Property 4: to_utc then localize is the identity away from DST transitions
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn wall_clock_round_trips(
        tz in arb_timezone(),
        // June and January avoid every transition of the zones above.
        month in prop_oneof![Just(1u32), Just(6u32)],
        day in 1u32..=28,
        hour in 0u32..=23,
        minute in 0u32..=59,
    ) {
        let date = NaiveDate::from_ymd_opt(2026, month, day).unwrap();
        let wall = format!("{:02}:{:02}", hour, minute);

        let instant = to_utc(date, &wall, &tz).unwrap();
        let back = localize(instant, &tz).unwrap();

        prop_assert_eq!(back.time, wall);
        prop_assert_eq!(back.date, date);
    }
}
