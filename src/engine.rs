//! # Timeline Engine
//!
//! Stateful holder of the current timeline snapshot. Mobile code pushes a
//! full trip snapshot on every refresh and queries the engine through thin
//! FFI calls.
//!
//! ## Architecture
//!
//! The engine keeps an `Arc<Timeline>`. Every update builds a fresh,
//! immutable [`Timeline`] and swaps the pointer, so a snapshot handed out by
//! [`TimelineEngine::snapshot`] never changes underneath its reader. There is
//! no incremental update path.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::grouping::CityGroup;
use crate::merge::{dedup_by_unique_id, merge_trip, PlanResolver, SequentialPlans};
use crate::merged::MergedItem;
use crate::model::{Plan, Poi, Segment, SegmentType, Step, Trip};
use crate::query::TimelineStats;
use crate::timeline::Timeline;
use crate::TimelineConfig;

// ============================================================================
// JSON Views
// ============================================================================

/// Merged item with its derived fields, for JSON consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView<'a> {
    pub unique_id: String,
    pub segment_type: SegmentType,
    pub original_segment_index: usize,
    pub date_string: Option<String>,
    pub city: Option<&'a str>,
    pub title: Option<&'a str>,
    pub time_range: Option<String>,
    pub segment: &'a Segment,
    pub plan: Option<&'a Plan>,
}

impl<'a> From<&'a MergedItem> for ItemView<'a> {
    fn from(item: &'a MergedItem) -> Self {
        Self {
            unique_id: item.unique_id(),
            segment_type: item.segment_type(),
            original_segment_index: item.original_segment_index(),
            date_string: item.date_string(),
            city: item.city(),
            title: item.title(),
            time_range: item.time_range_label(),
            segment: item.segment(),
            plan: item.plan(),
        }
    }
}

/// City group with item views, for JSON consumers.
#[derive(Debug, Clone, Serialize)]
pub struct CityGroupView<'a> {
    pub city: Option<&'a str>,
    pub items: Vec<ItemView<'a>>,
}

impl<'a> From<CityGroup<'a>> for CityGroupView<'a> {
    fn from(group: CityGroup<'a>) -> Self {
        Self {
            city: group.city,
            items: group.items.into_iter().map(ItemView::from).collect(),
        }
    }
}

fn to_json<T: Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("[TimelineEngine] JSON encoding failed: {}", e);
        fallback.to_string()
    })
}

// ============================================================================
// Timeline Engine
// ============================================================================

/// The stateful timeline engine.
///
/// Has two states: empty (no update yet, every query is empty) and
/// populated. Updates always replace the whole snapshot.
pub struct TimelineEngine {
    snapshot: Arc<Timeline>,
    config: TimelineConfig,
    selected_day: usize,
    update_count: u64,
}

impl TimelineEngine {
    /// Create a new engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(config: TimelineConfig) -> Self {
        Self {
            snapshot: Arc::new(Timeline::build(Vec::new(), config.clone())),
            config,
            selected_day: 0,
            update_count: 0,
        }
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Replace the timeline with a new full snapshot of merged items.
    pub fn update(&mut self, items: Vec<MergedItem>) {
        let timeline = Timeline::build(items, self.config.clone());
        self.install(timeline);
    }

    /// Merge a trip snapshot, pairing plans sequentially, and install it.
    pub fn update_with_trip(&mut self, trip: &Trip) {
        self.update_with_trip_resolved(trip, &SequentialPlans);
    }

    /// Merge a trip snapshot with a custom plan resolver and install it.
    pub fn update_with_trip_resolved<R>(&mut self, trip: &Trip, resolver: &R)
    where
        R: PlanResolver + ?Sized,
    {
        let mut items = merge_trip(trip, resolver);
        if self.config.deduplicate {
            items = dedup_by_unique_id(items);
        }
        info!(
            "[TimelineEngine] Updating from trip {} ({} items)",
            trip.id,
            items.len()
        );
        self.update(items);
    }

    fn install(&mut self, timeline: Timeline) {
        if self.selected_day >= timeline.number_of_days() {
            self.selected_day = 0;
        }
        self.snapshot = Arc::new(timeline);
        self.update_count += 1;
        debug!(
            "[TimelineEngine] Snapshot #{} installed: {} items over {} days",
            self.update_count,
            self.snapshot.all_items().len(),
            self.snapshot.number_of_days()
        );
    }

    /// Drop all state, back to empty.
    pub fn clear(&mut self) {
        self.snapshot = Arc::new(Timeline::build(Vec::new(), self.config.clone()));
        self.selected_day = 0;
    }

    /// The current snapshot. Stays valid and unchanged after later updates.
    pub fn snapshot(&self) -> Arc<Timeline> {
        Arc::clone(&self.snapshot)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.snapshot
    }

    /// Number of updates applied since creation.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Update configuration and rebuild the current snapshot with it.
    pub fn set_config(&mut self, config: TimelineConfig) {
        self.config = config;
        let mut items = self.snapshot.all_items().to_vec();
        if self.config.deduplicate {
            items = dedup_by_unique_id(items);
        }
        self.update(items);
    }

    pub fn get_config(&self) -> &TimelineConfig {
        &self.config
    }

    // ========================================================================
    // Day Selection
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn number_of_days(&self) -> usize {
        self.snapshot.number_of_days()
    }

    /// Select the day that identity lookups scan. Returns false and keeps the
    /// current selection when out of range.
    pub fn select_day(&mut self, index: usize) -> bool {
        if index < self.number_of_days() {
            self.selected_day = index;
            true
        } else {
            false
        }
    }

    pub fn selected_day(&self) -> usize {
        self.selected_day
    }

    pub fn items_for_selected_day(&self) -> Vec<&MergedItem> {
        self.snapshot.items_for_day_index(self.selected_day)
    }

    // ========================================================================
    // Identity Lookups (selected day)
    // ========================================================================

    pub fn get_poi(&self, poi_id: &str) -> Option<&Poi> {
        self.snapshot.find_poi(self.selected_day, poi_id)
    }

    pub fn get_step(&self, poi_id: &str) -> Option<&Step> {
        self.snapshot.find_step_for_poi(self.selected_day, poi_id)
    }

    pub fn get_booked_activity(&self, id: &str) -> Option<&MergedItem> {
        self.snapshot.find_booked_activity(self.selected_day, id)
    }

    // ========================================================================
    // JSON Projections (for efficient FFI)
    // ========================================================================

    pub fn get_day_labels(&self) -> Vec<String> {
        self.snapshot.day_labels()
    }

    pub fn get_date_strings(&self) -> Vec<String> {
        self.snapshot.available_date_strings()
    }

    /// City groups of a day as JSON.
    pub fn get_city_groups_json(&self, day_index: usize) -> String {
        let groups: Vec<CityGroupView<'_>> = self
            .snapshot
            .items_grouped_by_city_for_day(day_index)
            .into_iter()
            .map(CityGroupView::from)
            .collect();
        to_json(&groups, "[]")
    }

    /// Map POIs of a day as JSON.
    pub fn get_pois_json(&self, day_index: usize) -> String {
        match self.snapshot.date_for_day_index(day_index) {
            Some(date) => to_json(&self.snapshot.all_pois(date), "[]"),
            None => "[]".to_string(),
        }
    }

    /// Per-segment POI groups of a day as JSON.
    pub fn get_pois_grouped_json(&self, day_index: usize) -> String {
        match self.snapshot.date_for_day_index(day_index) {
            Some(date) => to_json(&self.snapshot.pois_grouped_by_segment(date), "[]"),
            None => "[]".to_string(),
        }
    }

    /// Per-segment route coordinates of a day as JSON.
    pub fn get_route_legs_json(&self, day_index: usize) -> String {
        match self.snapshot.date_for_day_index(day_index) {
            Some(date) => to_json(&self.snapshot.route_legs(date), "[]"),
            None => "[]".to_string(),
        }
    }

    /// Booked activity segments of a day as JSON.
    pub fn get_booked_activities_json(&self, day_index: usize) -> String {
        match self.snapshot.date_for_day_index(day_index) {
            Some(date) => to_json(&self.snapshot.booked_activities(date), "[]"),
            None => "[]".to_string(),
        }
    }

    /// Item at a city-group position as JSON. Returns empty string if absent.
    pub fn get_item_at_json(&self, section: usize, row: usize, day_index: usize) -> String {
        self.snapshot
            .item_at(section, row, day_index)
            .map(|item| to_json(&ItemView::from(item), ""))
            .unwrap_or_default()
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn stats(&self) -> TimelineStats {
        self.snapshot.stats()
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Global Singleton
// ============================================================================

/// Global engine instance.
///
/// This singleton allows FFI calls to access a shared engine without
/// passing state back and forth across the FFI boundary.
pub static ENGINE: Lazy<Mutex<TimelineEngine>> = Lazy::new(|| Mutex::new(TimelineEngine::new()));

/// Get a lock on the global engine.
///
/// A poisoned lock is recovered; snapshots are only ever swapped whole.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut TimelineEngine) -> R,
{
    let mut engine = ENGINE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut engine)
}

// ============================================================================
// Tests
// ============================================================================
