//! The unit the timeline operates on: one segment, its correlated plan and
//! its original position in the trip's segment list.

use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::datetime::{format_date_string, parse_datetime};
use crate::model::{AdditionalData, Plan, Poi, Segment, SegmentType, Step};

/// One identity rule: returns an id when the item carries enough data.
type UniqueIdRule = fn(&MergedItem) -> Option<String>;

/// Identity rules, evaluated top to bottom. The first rule that yields an id
/// wins; the segment index rule always yields one.
const UNIQUE_ID_RULES: [UniqueIdRule; 4] = [
    unique_id_from_booking,
    unique_id_from_activity_and_date,
    unique_id_from_start_and_title,
    unique_id_from_segment_index,
];

/// 1. Booking id of a booked/reserved activity.
fn unique_id_from_booking(item: &MergedItem) -> Option<String> {
    let booking_id = non_empty(item.additional_data()?.booking_id.as_deref())?;
    Some(format!("booking:{}", booking_id))
}

/// 2. Activity id combined with the indexed date.
fn unique_id_from_activity_and_date(item: &MergedItem) -> Option<String> {
    let activity_id = non_empty(item.additional_data()?.activity_id.as_deref())?;
    let date = item.date_string()?;
    Some(format!("activity:{}:{}", activity_id, date))
}

/// 3. Raw segment start date combined with the segment title.
fn unique_id_from_start_and_title(item: &MergedItem) -> Option<String> {
    let start = non_empty(item.segment.start_date.as_deref())?;
    let title = non_empty(item.segment.title.as_deref())?;
    Some(format!("segment:{}:{}", start, title))
}

/// 4. Position in the original segment list.
fn unique_id_from_segment_index(item: &MergedItem) -> Option<String> {
    Some(format!("index:{}", item.original_segment_index))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A segment merged with its optional plan.
///
/// Immutable once built. Equality and hashing go through [`unique_id`].
///
/// [`unique_id`]: MergedItem::unique_id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedItem {
    segment: Segment,
    plan: Option<Plan>,
    original_segment_index: usize,
}

impl MergedItem {
    /// Merge a segment with its plan. Booked/reserved activities never keep
    /// a plan.
    pub fn new(segment: Segment, plan: Option<Plan>, original_segment_index: usize) -> Self {
        let plan = if segment.segment_type.accepts_plan() {
            plan
        } else {
            if let Some(ref p) = plan {
                log::warn!(
                    "[MergeEngine] Dropping plan {} offered for booking segment {}",
                    p.id,
                    original_segment_index
                );
            }
            None
        };

        Self {
            segment,
            plan,
            original_segment_index,
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Position of the segment in the trip at fetch time. This is the handle
    /// for edit/delete calls against the backend.
    pub fn original_segment_index(&self) -> usize {
        self.original_segment_index
    }

    pub fn segment_type(&self) -> SegmentType {
        self.segment.segment_type
    }

    pub fn is_booking(&self) -> bool {
        self.segment_type().is_booking()
    }

    /// Booking detail, only for booked/reserved activities.
    pub fn additional_data(&self) -> Option<&AdditionalData> {
        if self.is_booking() {
            self.segment.additional_data.as_ref()
        } else {
            None
        }
    }

    /// Booking detail of a booked/reserved activity.
    pub fn booked_activity(&self) -> Option<&AdditionalData> {
        self.additional_data()
    }

    /// Start, preferring the booking datetime over the segment date.
    pub fn start_date(&self) -> Option<NaiveDateTime> {
        self.additional_data()
            .and_then(|extra| extra.start_datetime.as_deref())
            .and_then(parse_datetime)
            .or_else(|| self.segment.start_date.as_deref().and_then(parse_datetime))
    }

    /// Raw start text as sent by the backend, booking datetime first.
    pub fn start_text(&self) -> Option<&str> {
        non_empty(self.additional_data().and_then(|extra| extra.start_datetime.as_deref()))
            .or_else(|| non_empty(self.segment.start_date.as_deref()))
    }

    /// End, preferring the booking datetime over the segment date.
    pub fn end_date(&self) -> Option<NaiveDateTime> {
        self.additional_data()
            .and_then(|extra| extra.end_datetime.as_deref())
            .and_then(parse_datetime)
            .or_else(|| self.segment.end_date.as_deref().and_then(parse_datetime))
    }

    /// Calendar day of the start.
    pub fn date(&self) -> Option<NaiveDate> {
        self.start_date().map(|dt| dt.date())
    }

    /// Index key (`yyyy-MM-dd`) of the start day.
    pub fn date_string(&self) -> Option<String> {
        self.date().map(format_date_string)
    }

    /// Plan city, else segment city.
    pub fn city(&self) -> Option<&str> {
        non_empty(self.plan.as_ref().and_then(|p| p.city.as_deref()))
            .or_else(|| non_empty(self.segment.city.as_deref()))
    }

    /// Display title: booking title, then segment title, then plan name.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.additional_data().and_then(|extra| extra.title.as_deref()))
            .or_else(|| non_empty(self.segment.title.as_deref()))
            .or_else(|| non_empty(self.plan.as_ref().and_then(|p| p.name.as_deref())))
    }

    /// Adults, children and pets travelling in this segment.
    pub fn travellers(&self) -> (u32, u32, u32) {
        (self.segment.adults, self.segment.children, self.segment.pets)
    }

    /// `HH:MM - HH:MM` for the start and end times, when known.
    pub fn time_range_label(&self) -> Option<String> {
        let start = self.start_date()?;
        match self.end_date() {
            Some(end) => Some(format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))),
            None => Some(start.format("%H:%M").to_string()),
        }
    }

    pub fn steps(&self) -> &[Step] {
        self.plan.as_ref().map(|p| p.steps.as_slice()).unwrap_or_default()
    }

    /// POI of a manual POI item: its plan's first step POI.
    pub fn manual_poi(&self) -> Option<&Poi> {
        if self.segment_type() != SegmentType::ManualPoi {
            return None;
        }
        self.steps().first().and_then(|s| s.poi.as_ref())
    }

    /// POIs for map rendering, dispatched on segment type.
    pub fn get_all_pois(&self) -> Vec<&Poi> {
        match self.segment_type() {
            SegmentType::BookedActivity | SegmentType::ReservedActivity => Vec::new(),
            SegmentType::ManualPoi => self.manual_poi().into_iter().collect(),
            SegmentType::Itinerary => self.steps().iter().filter_map(|s| s.poi.as_ref()).collect(),
        }
    }

    /// Stable identity string.
    pub fn unique_id(&self) -> String {
        UNIQUE_ID_RULES
            .iter()
            .find_map(|rule| rule(self))
            .unwrap_or_else(|| format!("index:{}", self.original_segment_index))
    }
}

impl PartialEq for MergedItem {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id() == other.unique_id()
    }
}

impl Eq for MergedItem {}

impl Hash for MergedItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_id().hash(state);
    }
}
