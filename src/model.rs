//! Raw trip data as authored by the planning backend and the recommendation
//! engine.
//!
//! These types mirror the backend JSON (camelCase keys) and carry no derived
//! state. Everything the timeline needs is computed from them by
//! [`MergedItem`](crate::MergedItem).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::Coordinate;

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Segments
// ============================================================================

/// Discriminator of a backend segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentType {
    /// A day planned by the recommendation engine
    Itinerary,
    /// A single point of interest added by the user
    ManualPoi,
    /// An activity booked through the platform
    BookedActivity,
    /// An activity reserved but not yet paid
    ReservedActivity,
}

impl SegmentType {
    /// Booked and reserved activities carry `additionalData` and never a plan.
    pub fn is_booking(self) -> bool {
        matches!(self, SegmentType::BookedActivity | SegmentType::ReservedActivity)
    }

    /// Segment types that may be correlated with a plan.
    pub fn accepts_plan(self) -> bool {
        !self.is_booking()
    }
}

/// Booking detail attached to booked/reserved activity segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub start_datetime: Option<String>,
    #[serde(default)]
    pub end_datetime: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    /// Free-text cancellation policy
    #[serde(default)]
    pub cancellation: Option<String>,
}

/// One unit of travel metadata.
///
/// Segments have no identifier of their own; their position in the trip's
/// segment list is the only handle the backend accepts for edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub segment_type: SegmentType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `yyyy-MM-dd HH:mm[:ss]`
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adults: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pets: u32,
    /// Referenced POI for manual POI segments
    #[serde(default)]
    pub poi_id: Option<String>,
    /// Present only for booked/reserved activities
    #[serde(default)]
    pub additional_data: Option<AdditionalData>,
}

impl Segment {
    /// Create a bare segment of the given type.
    pub fn new(segment_type: SegmentType) -> Self {
        Self {
            segment_type,
            title: None,
            description: None,
            start_date: None,
            end_date: None,
            coordinate: None,
            city: None,
            adults: 0,
            children: 0,
            pets: 0,
            poi_id: None,
            additional_data: None,
        }
    }

    /// Whether `additionalData` is present exactly for booking types.
    pub fn is_consistent(&self) -> bool {
        self.segment_type.is_booking() == self.additional_data.is_some()
    }
}

// ============================================================================
// Plans
// ============================================================================

/// A point of interest as delivered by the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Poi {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            coordinate: None,
            city: None,
            category: None,
            image_url: None,
        }
    }
}

/// One visit in a plan. Identity is the step id alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: i64,
    #[serde(default)]
    pub poi: Option<Poi>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i32,
    #[serde(default)]
    pub start_date_times: Option<String>,
    #[serde(default)]
    pub end_date_times: Option<String>,
    /// Replacement POIs the user may swap in
    #[serde(default)]
    pub alternatives: Option<Vec<Poi>>,
}

impl Step {
    pub fn new(id: i64, poi: Option<Poi>) -> Self {
        Self {
            id,
            poi,
            score: None,
            order: 0,
            start_date_times: None,
            end_date_times: None,
            alternatives: None,
        }
    }
}

impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Step {}

impl Hash for Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Generation state of a plan, from the raw `generatedStatus` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanStatus {
    /// No recommendation could be found
    NotFound,
    /// Recommendation still being generated
    Pending,
    /// Steps are available
    Generated,
}

impl PlanStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            c if c < 0 => PlanStatus::NotFound,
            0 => PlanStatus::Pending,
            _ => PlanStatus::Generated,
        }
    }
}

/// Ordered visit steps produced by the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub generated_status: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl Plan {
    pub fn new(id: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            start_date: String::new(),
            end_date: String::new(),
            steps,
            city: None,
            generated_status: 1,
            name: None,
        }
    }

    pub fn status(&self) -> PlanStatus {
        PlanStatus::from_code(self.generated_status)
    }

    /// True once the plan is generated and holds at least one step.
    pub fn has_recommendations(&self) -> bool {
        self.status() == PlanStatus::Generated && !self.steps.is_empty()
    }
}

// ============================================================================
// Trip Snapshot
// ============================================================================

/// Raw trip snapshot driving every rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trip_hash: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub plans: Option<Vec<Plan>>,
    #[serde(default)]
    pub segments: Option<Vec<Segment>>,
}

impl Trip {
    /// Decode a trip snapshot from backend JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn segments(&self) -> &[Segment] {
        self.segments.as_deref().unwrap_or_default()
    }

    pub fn plans(&self) -> &[Plan] {
        self.plans.as_deref().unwrap_or_default()
    }
}
