//! WASM bindings for availability-grid.
//!
//! Exposes schedule normalization, DST-aware day segments and the cell bitset
//! to the browser editing UI via `wasm-bindgen`. Complex values cross the
//! boundary as JSON strings: schedules in their wire format, windows as
//! `{start_time, end_time}` arrays, and a day's cells as a JSON array of
//! booleans.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-grid-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/availability-grid-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_grid_wasm.wasm
//! ```

use availability_grid::{DayBits, Granularity, TimeWindow, WeekSchedule};
use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Boundary helpers
// ---------------------------------------------------------------------------

type BoundaryResult<T> = Result<T, String>;

fn to_js<T>(result: BoundaryResult<T>) -> Result<T, JsValue> {
    result.map_err(|e| JsValue::from_str(&e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> BoundaryResult<String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_granularity(minutes: u32) -> BoundaryResult<Granularity> {
    Granularity::new(minutes).map_err(|e| e.to_string())
}

/// Deserialize and validate windows; serde alone accepts a `24:00:00` start
/// and zero-length windows.
fn parse_windows(json: &str) -> BoundaryResult<Vec<TimeWindow>> {
    let windows: Vec<TimeWindow> =
        serde_json::from_str(json).map_err(|e| format!("Invalid windows JSON: {}", e))?;
    for window in &windows {
        window.validate().map_err(|e| e.to_string())?;
    }
    Ok(windows)
}

fn parse_bits(json: &str, granularity: Granularity) -> BoundaryResult<DayBits> {
    let cells: Vec<bool> =
        serde_json::from_str(json).map_err(|e| format!("Invalid cells JSON: {}", e))?;
    DayBits::from_cells(&cells, granularity).map_err(|e| e.to_string())
}

fn bits_to_json(bits: &DayBits) -> BoundaryResult<String> {
    to_json(&bits.iter().collect::<Vec<bool>>())
}

// ---------------------------------------------------------------------------
// Implementations (plain Rust, testable off-wasm)
// ---------------------------------------------------------------------------

fn normalize_schedule_impl(schedule_json: &str) -> BoundaryResult<String> {
    let schedule = WeekSchedule::from_json(schedule_json).map_err(|e| e.to_string())?;
    let normalized = availability_grid::normalize_schedule(&schedule).map_err(|e| e.to_string())?;
    normalized.to_json().map_err(|e| e.to_string())
}

fn build_day_segments_impl(date: &str, windows_json: &str, timezone: &str) -> BoundaryResult<String> {
    let date: NaiveDate = date
        .parse()
        .map_err(|e| format!("Invalid date '{}': {}", date, e))?;
    let windows = parse_windows(windows_json)?;
    let segments = availability_grid::build_day_segments_in(date, &windows, timezone)
        .map_err(|e| e.to_string())?;
    to_json(&segments)
}

fn from_windows_impl(windows_json: &str, granularity: u32) -> BoundaryResult<String> {
    let granularity = parse_granularity(granularity)?;
    let windows = parse_windows(windows_json)?;
    bits_to_json(&DayBits::from_windows(&windows, granularity))
}

fn to_windows_impl(bits_json: &str, granularity: u32) -> BoundaryResult<String> {
    let bits = parse_bits(bits_json, parse_granularity(granularity)?)?;
    to_json(&bits.to_windows())
}

fn toggle_cell_impl(
    bits_json: &str,
    granularity: u32,
    index: usize,
    value: bool,
) -> BoundaryResult<String> {
    let bits = parse_bits(bits_json, parse_granularity(granularity)?)?;
    // JS callers are not trusted to stay in bounds; report instead of panicking.
    if index >= bits.len() {
        return Err(format!(
            "Cell index {} out of range for {} cells",
            index,
            bits.len()
        ));
    }
    bits_to_json(&bits.toggle(index, value))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Canonicalize a schedule.
///
/// Takes and returns the `{"YYYY-MM-DD": [{start_time, end_time}]}` wire format.
#[wasm_bindgen(js_name = "normalizeSchedule")]
pub fn normalize_schedule(schedule_json: &str) -> Result<String, JsValue> {
    to_js(normalize_schedule_impl(schedule_json))
}

/// Real elapsed minutes for each window on `date` in an IANA timezone.
///
/// Returns a JSON array of `{date, start_minutes, end_minutes, duration_minutes}`.
#[wasm_bindgen(js_name = "buildDaySegments")]
pub fn build_day_segments(date: &str, windows_json: &str, timezone: &str) -> Result<String, JsValue> {
    to_js(build_day_segments_impl(date, windows_json, timezone))
}

/// Index of the cell starting at `hour:minute`; misaligned times are errors.
#[wasm_bindgen(js_name = "cellIndex")]
pub fn cell_index(hour: u32, minute: u32, granularity: u32) -> Result<usize, JsValue> {
    to_js(
        parse_granularity(granularity)
            .and_then(|g| g.idx(hour, minute).map_err(|e| e.to_string())),
    )
}

/// Encode windows into a JSON array of one boolean per cell.
#[wasm_bindgen(js_name = "fromWindows")]
pub fn from_windows(windows_json: &str, granularity: u32) -> Result<String, JsValue> {
    to_js(from_windows_impl(windows_json, granularity))
}

/// Decode a JSON array of cells into canonical windows.
#[wasm_bindgen(js_name = "toWindows")]
pub fn to_windows(bits_json: &str, granularity: u32) -> Result<String, JsValue> {
    to_js(to_windows_impl(bits_json, granularity))
}

/// Return a new cell array with cell `index` set to `value`.
#[wasm_bindgen(js_name = "toggleCell")]
pub fn toggle_cell(
    bits_json: &str,
    granularity: u32,
    index: usize,
    value: bool,
) -> Result<String, JsValue> {
    to_js(toggle_cell_impl(bits_json, granularity, index, value))
}
