//! WASM bindings for slot-engine.
//!
//! Exposes availability resolution, slot generation, viewer localization and
//! commit-time re-validation to the JavaScript request handlers via
//! `wasm-bindgen`. Complex inputs and outputs cross the boundary as JSON strings
//! using the same camelCase field names as the coach and booking documents.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use slot_engine::timezone::parse_date;
use slot_engine::{
    BookingWindow, CoachSchedule, CommittedBooking, DayAvailability, EngineError, SessionLength,
    SlotConfig, SlotQuery,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayAvailabilityDto {
    date: NaiveDate,
    is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
}

impl From<&DayAvailability> for DayAvailabilityDto {
    fn from(day: &DayAvailability) -> Self {
        Self {
            date: day.date,
            is_available: day.is_available(),
            start_time: day.window.map(|w| w.start_time()),
            end_time: day.window.map(|w| w.end_time()),
        }
    }
}

/// Input for `availableSlots`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRequest {
    schedule: CoachSchedule,
    #[serde(default)]
    bookings: Vec<CommittedBooking>,
    date: String,
    duration_minutes: u32,
    #[serde(default)]
    buffer_minutes: u32,
    #[serde(default)]
    viewer_timezone: Option<String>,
    #[serde(default)]
    exclude_booking_id: Option<String>,
    #[serde(default)]
    config: SlotConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engine_err(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn from_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve the effective availability window for one coach-local date.
///
/// `schedule_json` is a coach schedule document (`timezone`, `weeklyRules`,
/// `overrides`). Returns `{date, isAvailable, startTime?, endTime?}`.
#[wasm_bindgen(js_name = "resolveDay")]
pub fn resolve_day(schedule_json: &str, date: &str) -> Result<String, JsValue> {
    let schedule: CoachSchedule = from_json(schedule_json, "schedule")?;
    let date = parse_date(date).map_err(engine_err)?;
    let day = slot_engine::resolve(date, &schedule.weekly_rules, &schedule.overrides);

    to_json(&DayAvailabilityDto::from(&day))
}

/// Compute bookable slots for one date.
///
/// `request_json` carries `schedule`, `bookings`, `date`, `durationMinutes`,
/// optional `bufferMinutes`, `excludeBookingId` (reschedules) and `config`.
/// With `viewerTimezone` set, each slot is returned with the viewer's wall
/// clock; otherwise slots are coach-local.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(request_json: &str) -> Result<String, JsValue> {
    let request: SlotRequest = from_json(request_json, "slot request")?;
    let date = parse_date(&request.date).map_err(engine_err)?;
    let session = SessionLength::new(request.duration_minutes, request.buffer_minutes);

    let mut query = SlotQuery::new(&request.schedule, &request.bookings, session)
        .map_err(engine_err)?
        .with_config(request.config);
    if let Some(id) = request.exclude_booking_id.as_deref() {
        query = query.excluding(id);
    }

    match request.viewer_timezone.as_deref() {
        Some(viewer_tz) => to_json(&query.slots_for_viewer(date, viewer_tz).map_err(engine_err)?),
        None => to_json(&query.slots_for_date(date)),
    }
}

/// Show a coach-local slot in the viewer's timezone as `{date, time}`.
#[wasm_bindgen(js_name = "localizeSlot")]
pub fn localize_slot(
    date: &str,
    slot: &str,
    coach_timezone: &str,
    viewer_timezone: &str,
) -> Result<String, JsValue> {
    let date = parse_date(date).map_err(engine_err)?;
    let wall = slot_engine::to_viewer_timezone(date, slot, coach_timezone, viewer_timezone)
        .map_err(engine_err)?;
    to_json(&wall)
}

/// Localize a JSON array of coach-local `"HH:mm"` slots for one date.
///
/// Returns an array of `{date, time}` in the same order.
#[wasm_bindgen(js_name = "localizeSlots")]
pub fn localize_slots(
    date: &str,
    slots_json: &str,
    coach_timezone: &str,
    viewer_timezone: &str,
) -> Result<String, JsValue> {
    let date = parse_date(date).map_err(engine_err)?;
    let slots: Vec<String> = from_json(slots_json, "slots")?;
    let walls =
        slot_engine::localizer::localize_slots(date, &slots, coach_timezone, viewer_timezone)
            .map_err(engine_err)?;
    to_json(&walls)
}

/// Map a viewer's selection to `{scheduledStart, scheduledEnd}` for storage.
#[wasm_bindgen(js_name = "bookingWindow")]
pub fn booking_window(
    date: &str,
    slot: &str,
    viewer_timezone: &str,
    duration_minutes: u32,
) -> Result<String, JsValue> {
    let date = parse_date(date).map_err(engine_err)?;
    let window = slot_engine::localizer::selection_to_booking_window(
        date,
        slot,
        viewer_timezone,
        duration_minutes,
    )
    .map_err(engine_err)?;
    to_json(&window)
}

/// Re-check a booking window against the live booking set before commit.
///
/// Returns `false` when the slot has been taken since it was offered; malformed
/// input is an error.
#[wasm_bindgen(js_name = "revalidateSelection")]
pub fn revalidate_selection(
    window_json: &str,
    buffer_minutes: u32,
    live_bookings_json: &str,
    exclude_booking_id: Option<String>,
) -> Result<bool, JsValue> {
    let window: BookingWindow = from_json(window_json, "booking window")?;
    let live: Vec<CommittedBooking> = from_json(live_bookings_json, "bookings")?;

    match slot_engine::revalidate_selection(
        &window,
        buffer_minutes,
        &live,
        exclude_booking_id.as_deref(),
    ) {
        Ok(()) => Ok(true),
        Err(EngineError::SlotNoLongerAvailable { .. }) => Ok(false),
        Err(e) => Err(engine_err(e)),
    }
}
