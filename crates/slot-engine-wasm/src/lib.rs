//! WASM bindings for slot-engine.
//!
//! Exposes slot and available-day computation to the booking page via
//! `wasm-bindgen`. Owner records and results cross the boundary as JSON
//! strings in the same camelCase shape the front end stores.
//!
//! The front end fetches records itself, so only the pure computations are
//! bound here; caching and writes stay on the JavaScript side.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::Serialize;
use slot_engine::interval::{format_date, parse_date};
use slot_engine::OwnerRecords;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers shared by the exports (plain `String` errors so they are testable
// off-wasm; the exports wrap them in `JsValue`)
// ---------------------------------------------------------------------------

fn parse_records(json: &str) -> Result<OwnerRecords, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid records JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn slots_json(
    records_json: &str,
    location_id: &str,
    date: &str,
    slot_minutes: Option<u32>,
) -> Result<String, String> {
    let records = parse_records(records_json)?;
    let date = parse_date(date).map_err(|e| e.to_string())?;
    let slots = slot_engine::compute_slots(
        &records,
        location_id,
        date,
        slot_minutes.unwrap_or(slot_engine::DEFAULT_SLOT_MINUTES),
    );
    to_json(&slots)
}

fn days_json(rules_json: &str, month: u32, year: i32) -> Result<String, String> {
    let rules: Vec<slot_engine::AvailabilityRule> = serde_json::from_str(rules_json)
        .map_err(|e| format!("Invalid rules JSON: {}", e))?;
    let days: Vec<String> = slot_engine::available_days(&rules, year, month)
        .into_iter()
        .map(format_date)
        .collect();
    to_json(&days)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the bookable slots for a location on a date.
///
/// `records_json` is an object with `locations`, `areas`, `rules` and
/// `bookings` arrays (any may be omitted). `date` is "YYYY-MM-DD".
/// `slot_minutes` defaults to 60. Returns a JSON array of
/// `{startTime, endTime, isAvailable}` objects.
#[wasm_bindgen(js_name = "computeAvailableSlots")]
pub fn compute_available_slots(
    records_json: &str,
    location_id: &str,
    date: &str,
    slot_minutes: Option<u32>,
) -> Result<String, JsValue> {
    slots_json(records_json, location_id, date, slot_minutes).map_err(|e| JsValue::from_str(&e))
}

/// List the days of a month whose weekday has at least one rule.
///
/// `rules_json` is a JSON array of availability rules; `month` is 1-based.
/// Returns a JSON array of "YYYY-MM-DD" strings.
#[wasm_bindgen(js_name = "computeAvailableDays")]
pub fn compute_available_days(rules_json: &str, month: u32, year: i32) -> Result<String, JsValue> {
    days_json(rules_json, month, year).map_err(|e| JsValue::from_str(&e))
}
