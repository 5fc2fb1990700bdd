//! Unified error handling for the trip-timeline library.
//!
//! Projection queries never fail: missing or unparseable data degrades to
//! empty results. This type only covers snapshot decoding, encoding of JSON
//! projections and caller contract violations.

use std::fmt;

/// Unified error type for trip-timeline operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Trip snapshot could not be decoded
    InvalidSnapshot { message: String },
    /// Day index outside the populated range
    InvalidDayIndex { index: i64, day_count: usize },
    /// Projection could not be encoded
    Serialization { message: String },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineError::InvalidSnapshot { message } => {
                write!(f, "Invalid trip snapshot: {}", message)
            }
            TimelineError::InvalidDayIndex { index, day_count } => {
                write!(
                    f,
                    "Day index {} out of range ({} days available)",
                    index, day_count
                )
            }
            TimelineError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for TimelineError {}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            TimelineError::InvalidSnapshot {
                message: err.to_string(),
            }
        } else {
            TimelineError::Serialization {
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for trip-timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Extension trait for converting Option to TimelineError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an invalid day index error.
    fn ok_or_invalid_day(self, index: i64, day_count: usize) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_invalid_day(self, index: i64, day_count: usize) -> Result<T> {
        self.ok_or(TimelineError::InvalidDayIndex { index, day_count })
    }
}
