//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose the global
//! [`TimelineEngine`](crate::TimelineEngine) to Kotlin and Swift. All
//! functions are prefixed with `timeline_` and return plain values or JSON
//! strings; none of them fail.

use log::{info, warn};

use crate::engine::with_engine;
use crate::model::Trip;
use crate::query::TimelineStats;
use crate::{init_logging, TimelineConfig};

/// Convert a host day index, clamping negatives to "no day".
fn host_day(index: i32) -> Option<usize> {
    if index < 0 {
        warn!("[TimelineEngine] Negative day index {} from host", index);
        debug_assert!(index >= 0, "negative day index {}", index);
        return None;
    }
    Some(index as usize)
}

/// Initialize the engine (call once at app startup).
#[uniffi::export]
pub fn timeline_init() {
    init_logging();
    info!("[TimelineEngine] Initialized");
}

/// Clear all engine state.
#[uniffi::export]
pub fn timeline_clear() {
    with_engine(|e| e.clear());
    info!("[TimelineEngine] Cleared");
}

/// Replace the timeline with a trip snapshot given as backend JSON.
/// Returns false and keeps the previous snapshot if the JSON is invalid.
#[uniffi::export]
pub fn timeline_update_from_json(trip_json: String) -> bool {
    match Trip::from_json(&trip_json) {
        Ok(trip) => {
            with_engine(|e| e.update_with_trip(&trip));
            true
        }
        Err(e) => {
            warn!("[TimelineEngine] Rejected trip snapshot: {}", e);
            false
        }
    }
}

/// Set timeline configuration.
#[uniffi::export]
pub fn timeline_set_config(config: TimelineConfig) {
    with_engine(|e| e.set_config(config));
}

/// Get the number of days with items.
#[uniffi::export]
pub fn timeline_get_day_count() -> u32 {
    with_engine(|e| e.number_of_days() as u32)
}

/// Get day-selector labels, in day order.
#[uniffi::export]
pub fn timeline_get_day_labels() -> Vec<String> {
    with_engine(|e| e.get_day_labels())
}

/// Get day keys (`yyyy-MM-dd`), in day order.
#[uniffi::export]
pub fn timeline_get_date_strings() -> Vec<String> {
    with_engine(|e| e.get_date_strings())
}

/// Select the day used by identity lookups.
#[uniffi::export]
pub fn timeline_select_day(day_index: i32) -> bool {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.select_day(i)),
        None => false,
    }
}

/// Get city groups for a day as JSON.
/// Returns: [{"city": "...", "items": [{"uniqueId": "...", ...}, ...]}, ...]
#[uniffi::export]
pub fn timeline_get_city_groups_json(day_index: i32) -> String {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.get_city_groups_json(i)),
        None => "[]".to_string(),
    }
}

/// Get map POIs for a day as JSON.
#[uniffi::export]
pub fn timeline_get_pois_json(day_index: i32) -> String {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.get_pois_json(i)),
        None => "[]".to_string(),
    }
}

/// Get POIs for a day grouped per segment as JSON (one route leg per group).
#[uniffi::export]
pub fn timeline_get_pois_grouped_json(day_index: i32) -> String {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.get_pois_grouped_json(i)),
        None => "[]".to_string(),
    }
}

/// Get route leg coordinates for a day as JSON.
/// Returns: [[{"latitude": x, "longitude": y}, ...], ...]
#[uniffi::export]
pub fn timeline_get_route_legs_json(day_index: i32) -> String {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.get_route_legs_json(i)),
        None => "[]".to_string(),
    }
}

/// Get booked and reserved activities for a day as JSON.
#[uniffi::export]
pub fn timeline_get_booked_activities_json(day_index: i32) -> String {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.get_booked_activities_json(i)),
        None => "[]".to_string(),
    }
}

/// Get the item at a city-group position as JSON.
/// Returns empty string if there is nothing at that position.
#[uniffi::export]
pub fn timeline_get_item_at_json(section: u32, row: u32, day_index: i32) -> String {
    match host_day(day_index) {
        Some(i) => with_engine(|e| e.get_item_at_json(section as usize, row as usize, i)),
        None => String::new(),
    }
}

/// Get engine statistics.
#[uniffi::export]
pub fn timeline_get_stats() -> TimelineStats {
    with_engine(|e| e.stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_day_passes_non_negative() {
        assert_eq!(host_day(0), Some(0));
        assert_eq!(host_day(4), Some(4));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "negative day index -1")]
    fn test_host_day_negative_asserts_in_debug() {
        host_day(-1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "negative day index -3")]
    fn test_day_query_negative_asserts_in_debug() {
        timeline_get_city_groups_json(-3);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_negative_day_clamps_to_no_results() {
        assert_eq!(host_day(-1), None);
        assert_eq!(timeline_get_city_groups_json(-1), "[]");
        assert_eq!(timeline_get_pois_json(-1), "[]");
        assert_eq!(timeline_get_route_legs_json(-1), "[]");
        assert_eq!(timeline_get_item_at_json(0, 0, -1), "");
        assert!(!timeline_select_day(-1));
    }
}
