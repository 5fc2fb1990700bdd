//! # Trip Timeline
//!
//! Aggregates a trip's planning data into one date-ordered, city-grouped
//! timeline for list UIs, maps and route calculation.
//!
//! This library provides:
//! - Merging of backend segments with recommendation plans
//! - A date index rebuilt in full from every trip snapshot
//! - City grouping with the day's primary city first
//! - POI, routing and booked-activity projections
//!
//! ## Features
//!
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use trip_timeline::{merge_trip, SequentialPlans, Timeline, TimelineConfig, Trip};
//!
//! let trip = Trip::from_json(r#"{
//!     "id": "trip-1",
//!     "segments": [{"segmentType": "itinerary", "startDate": "2025-03-10", "city": "Paris"}],
//!     "plans": [{"id": "p1", "steps": [{"id": 1, "poi": {"id": "louvre"}}]}]
//! }"#).unwrap();
//!
//! let timeline = Timeline::build(merge_trip(&trip, &SequentialPlans), TimelineConfig::default());
//!
//! assert_eq!(timeline.number_of_days(), 1);
//! let day = timeline.available_dates()[0];
//! assert_eq!(timeline.all_pois(day)[0].id, "louvre");
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, TimelineError};

// Backend date/time formats
pub mod datetime;
pub use datetime::{format_date_string, parse_date, parse_datetime};

// Raw trip data (segments, plans, steps, POIs)
pub mod model;
pub use model::{AdditionalData, Plan, PlanStatus, Poi, Segment, SegmentType, Step, Trip};

// Segment + plan + original position
pub mod merged;
pub use merged::MergedItem;

// Merge engine
pub mod merge;
pub use merge::{
    dedup_by_unique_id, merge_resolved, merge_segments, merge_trip, PlanIds, PlanResolver,
    SequentialPlans,
};

// Date index
pub mod timeline;
pub use timeline::Timeline;

// City grouping
pub mod grouping;
pub use grouping::{group_by_city, CityGroup};

// Map, routing and booking projections
pub mod query;
pub use query::TimelineStats;

// Stateful engine (singleton holding the current snapshot)
pub mod engine;
pub use engine::{with_engine, TimelineEngine, ENGINE};

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TripTimelineRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate.
///
/// # Example
/// ```
/// use trip_timeline::Coordinate;
/// let point = Coordinate::new(48.8606, 2.3376); // Louvre
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Configuration for timeline building and projections.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TimelineConfig {
    /// City grouping key for items without a city.
    /// Default: "Unknown"
    pub unknown_city_label: String,

    /// strftime pattern for day-selector labels.
    /// Default: "%a, %b %-d" (e.g. "Mon, Mar 10")
    pub day_label_format: String,

    /// Drop later items whose unique id repeats an earlier one when
    /// updating from a trip snapshot.
    /// Default: false
    pub deduplicate: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            unknown_city_label: "Unknown".to_string(),
            day_label_format: "%a, %b %-d".to_string(),
            deduplicate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(48.85, 2.35).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_coordinate_aliases() {
        let c: Coordinate = serde_json::from_str(r#"{"lat": 1.5, "lng": 2.5}"#).unwrap();
        assert_eq!(c, Coordinate::new(1.5, 2.5));
    }

    #[test]
    fn test_default_config() {
        let config = TimelineConfig::default();
        assert_eq!(config.unknown_city_label, "Unknown");
        assert!(!config.deduplicate);
    }
}
