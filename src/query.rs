//! Projections consumed by map rendering, routing and list UIs.
//!
//! All queries are read-only over a [`Timeline`] and degrade to empty results
//! on missing data. Identity lookups scan a single day; per-day item counts
//! are in the tens.

use chrono::NaiveDate;
use serde::Serialize;

use crate::merged::MergedItem;
use crate::model::{Poi, Segment, Step};
use crate::timeline::Timeline;
use crate::Coordinate;

/// Counters describing a timeline snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TimelineStats {
    pub item_count: u32,
    pub dated_item_count: u32,
    pub undated_item_count: u32,
    pub day_count: u32,
    pub booked_activity_count: u32,
}

impl Timeline {
    // ========================================================================
    // POI Projections
    // ========================================================================

    /// Every POI shown on the map for `date`, in item then plan order.
    pub fn all_pois(&self, date: NaiveDate) -> Vec<&Poi> {
        self.items_for_date(date)
            .into_iter()
            .flat_map(MergedItem::get_all_pois)
            .collect()
    }

    /// POIs for `date`, one group per item, skipping items without POIs.
    ///
    /// Routing computes one leg per group and never joins groups.
    pub fn pois_grouped_by_segment(&self, date: NaiveDate) -> Vec<Vec<&Poi>> {
        self.items_for_date(date)
            .into_iter()
            .map(MergedItem::get_all_pois)
            .filter(|pois| !pois.is_empty())
            .collect()
    }

    /// Per-segment coordinate lists for route calculation.
    ///
    /// POIs without a coordinate are skipped, as are legs left empty.
    pub fn route_legs(&self, date: NaiveDate) -> Vec<Vec<Coordinate>> {
        self.pois_grouped_by_segment(date)
            .into_iter()
            .map(|pois| {
                pois.into_iter()
                    .filter_map(|poi| poi.coordinate)
                    .filter(Coordinate::is_valid)
                    .collect::<Vec<_>>()
            })
            .filter(|leg| !leg.is_empty())
            .collect()
    }

    // ========================================================================
    // Booked Activities
    // ========================================================================

    /// Booked and reserved activity segments on `date`.
    pub fn booked_activities(&self, date: NaiveDate) -> Vec<&Segment> {
        self.items_for_date(date)
            .into_iter()
            .filter(|item| item.is_booking())
            .map(MergedItem::segment)
            .collect()
    }

    /// Booked and reserved activity segments across the whole trip.
    pub fn all_booked_activities(&self) -> Vec<&Segment> {
        self.all_items()
            .iter()
            .filter(|item| item.is_booking())
            .map(MergedItem::segment)
            .collect()
    }

    // ========================================================================
    // Positional Lookups
    // ========================================================================

    /// Item at `row` of city group `section` on the `day_index`-th day.
    pub fn item_at(&self, section: usize, row: usize, day_index: usize) -> Option<&MergedItem> {
        self.items_grouped_by_city_for_day(day_index)
            .get(section)?
            .items
            .get(row)
            .copied()
    }

    /// Items on `date` ordered by start time. Stable: items with equal or
    /// missing times keep snapshot order, missing times last.
    pub fn items_sorted_by_time(&self, date: NaiveDate) -> Vec<&MergedItem> {
        let mut items = self.items_for_date(date);
        items.sort_by_key(|item| (item.start_date().is_none(), item.start_date()));
        items
    }

    // ========================================================================
    // Identity Lookups
    // ========================================================================

    /// POI with `poi_id` on the `day_index`-th day.
    pub fn find_poi(&self, day_index: usize, poi_id: &str) -> Option<&Poi> {
        self.items_for_day_index(day_index)
            .into_iter()
            .flat_map(MergedItem::get_all_pois)
            .find(|poi| poi.id == poi_id)
    }

    /// Plan step visiting `poi_id` on the `day_index`-th day.
    pub fn find_step_for_poi(&self, day_index: usize, poi_id: &str) -> Option<&Step> {
        self.items_for_day_index(day_index)
            .into_iter()
            .flat_map(MergedItem::steps)
            .find(|step| step.poi.as_ref().is_some_and(|poi| poi.id == poi_id))
    }

    /// Booked activity on the `day_index`-th day whose booking id, or failing
    /// that activity id, equals `id`.
    pub fn find_booked_activity(&self, day_index: usize, id: &str) -> Option<&MergedItem> {
        let bookings: Vec<&MergedItem> = self
            .items_for_day_index(day_index)
            .into_iter()
            .filter(|item| item.is_booking())
            .collect();

        bookings
            .iter()
            .find(|item| {
                item.additional_data()
                    .and_then(|extra| extra.booking_id.as_deref())
                    == Some(id)
            })
            .or_else(|| {
                bookings.iter().find(|item| {
                    item.additional_data()
                        .and_then(|extra| extra.activity_id.as_deref())
                        == Some(id)
                })
            })
            .copied()
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn stats(&self) -> TimelineStats {
        let undated = self.undated_items().len();
        TimelineStats {
            item_count: self.all_items().len() as u32,
            dated_item_count: (self.all_items().len() - undated) as u32,
            undated_item_count: undated as u32,
            day_count: self.number_of_days() as u32,
            booked_activity_count: self.all_booked_activities().len() as u32,
        }
    }
}
