//! WASM bindings for stay-engine.
//!
//! Exposes blocked-date expansion, conflict checks and free windows to a
//! browser date picker via `wasm-bindgen`. All complex types are passed as
//! JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p stay-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/stay-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/stay_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use stay_engine::{AvailabilityPolicy, Booking, BookingStatus, DateRange, GuestInfo};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for bookings passed from JavaScript.
///
/// Accepts the column names of the bookings table (`start_date`, `end_date`)
/// as well as `start`/`end`. A missing status means the caller already
/// filtered to confirmed bookings.
#[derive(Deserialize)]
struct BookingInput {
    #[serde(default)]
    id: String,
    #[serde(alias = "start_date")]
    start: String,
    #[serde(alias = "end_date")]
    end: String,
    #[serde(default = "confirmed")]
    status: BookingStatus,
}

fn confirmed() -> BookingStatus {
    BookingStatus::Confirmed
}

#[derive(Deserialize)]
struct RangeInput {
    #[serde(alias = "start_date")]
    start: String,
    #[serde(alias = "end_date")]
    end: String,
}

#[derive(Serialize)]
struct RangeDto {
    start: String,
    end: String,
}

impl From<&DateRange> for RangeDto {
    fn from(r: &DateRange) -> Self {
        Self {
            start: r.start().to_string(),
            end: r.end().to_string(),
        }
    }
}

#[derive(Serialize)]
struct ConflictDto {
    id: String,
    start: String,
    end: String,
    overlap_days: i64,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a calendar date, dropping any time of day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (`2026-02-17T14:00:00+00:00`, the shape
/// `Date.prototype.toISOString` produces) and naive datetimes.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.date())
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_range(start: &str, end: &str) -> Result<DateRange, String> {
    DateRange::new(parse_date(start)?, parse_date(end)?).map_err(|e| e.to_string())
}

/// Convert a JSON array of booking objects into engine bookings.
///
/// Guest details and apartment ids play no part in availability, so they are
/// left empty.
fn parse_bookings_json(json: &str) -> Result<Vec<Booking>, String> {
    let inputs: Vec<BookingInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid bookings JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            Ok(Booking {
                id: input.id.as_str().into(),
                apartment_id: "".into(),
                guest: GuestInfo {
                    name: String::new(),
                    email: String::new(),
                    phone: String::new(),
                },
                range: parse_range(&input.start, &input.end)?,
                num_guests: 0,
                status: input.status,
            })
        })
        .collect()
}

fn parse_candidate_json(json: &str) -> Result<DateRange, String> {
    let input: RangeInput =
        serde_json::from_str(json).map_err(|e| format!("Invalid range JSON: {}", e))?;
    parse_range(&input.start, &input.end)
}

/// `None` or an empty string means the default policy.
fn parse_policy_json(json: Option<&str>) -> Result<AvailabilityPolicy, String> {
    match json {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(raw).map_err(|e| format!("Invalid policy JSON: {}", e))
        }
        _ => Ok(AvailabilityPolicy::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Implementations (plain Rust errors, testable off-wasm)
// ---------------------------------------------------------------------------

fn blocked_dates_impl(bookings_json: &str, policy_json: Option<&str>) -> Result<String, String> {
    let bookings = parse_bookings_json(bookings_json)?;
    let policy = parse_policy_json(policy_json)?;
    let days: Vec<String> = stay_engine::expand_blocked_dates(&bookings, &policy)
        .iter()
        .map(|d| d.to_string())
        .collect();
    to_json(&days)
}

fn has_conflict_impl(
    candidate_json: &str,
    bookings_json: &str,
    policy_json: Option<&str>,
) -> Result<bool, String> {
    let candidate = parse_candidate_json(candidate_json)?;
    let bookings = parse_bookings_json(bookings_json)?;
    let policy = parse_policy_json(policy_json)?;
    Ok(stay_engine::has_conflict(&candidate, &bookings, &policy))
}

fn find_conflicts_impl(
    candidate_json: &str,
    bookings_json: &str,
    policy_json: Option<&str>,
) -> Result<String, String> {
    let candidate = parse_candidate_json(candidate_json)?;
    let bookings = parse_bookings_json(bookings_json)?;
    let policy = parse_policy_json(policy_json)?;

    let dtos: Vec<ConflictDto> = stay_engine::find_conflicts(&candidate, &bookings, &policy)
        .iter()
        .map(|c| ConflictDto {
            id: c.booking.id.to_string(),
            start: c.booking.range.start().to_string(),
            end: c.booking.range.end().to_string(),
            overlap_days: c.overlap_days,
        })
        .collect();
    to_json(&dtos)
}

fn free_windows_impl(
    bookings_json: &str,
    window_start: &str,
    window_end: &str,
    policy_json: Option<&str>,
) -> Result<String, String> {
    let bookings = parse_bookings_json(bookings_json)?;
    let window = parse_range(window_start, window_end)?;
    let policy = parse_policy_json(policy_json)?;

    let dtos: Vec<RangeDto> = stay_engine::calendar::free_windows(&bookings, &window, &policy)
        .iter()
        .map(RangeDto::from)
        .collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand bookings into the dates a picker must exclude.
///
/// `bookings_json` is a JSON array of `{start, end, status?}` objects.
/// Returns a JSON array of `YYYY-MM-DD` strings, sorted ascending.
#[wasm_bindgen(js_name = "expandBlockedDates")]
pub fn expand_blocked_dates(
    bookings_json: &str,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    blocked_dates_impl(bookings_json, policy_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Whether a candidate `{start, end}` range clashes with any booking.
#[wasm_bindgen(js_name = "hasConflict")]
pub fn has_conflict(
    candidate_json: &str,
    bookings_json: &str,
    policy_json: Option<String>,
) -> Result<bool, JsValue> {
    has_conflict_impl(candidate_json, bookings_json, policy_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Every booking a candidate range clashes with, as a JSON array of
/// `{id, start, end, overlap_days}` objects.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    candidate_json: &str,
    bookings_json: &str,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    find_conflicts_impl(candidate_json, bookings_json, policy_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Check a party size against an apartment's capacity. Throws the
/// user-facing message on failure.
#[wasm_bindgen(js_name = "validateGuestCount")]
pub fn validate_guest_count(requested: u32, max: u32) -> Result<(), JsValue> {
    stay_engine::validate_guest_count(requested, max)
        .map_err(|e| JsValue::from_str(&e.user_message()))
}

/// Free `{start, end}` windows between bookings inside a date window.
#[wasm_bindgen(js_name = "freeWindows")]
pub fn free_windows(
    bookings_json: &str,
    window_start: &str,
    window_end: &str,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    free_windows_impl(bookings_json, window_start, window_end, policy_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}
