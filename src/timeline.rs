//! # Date Index
//!
//! Immutable timeline snapshot: the flat list of merged items plus an index
//! from calendar day to the items starting that day.
//!
//! A [`Timeline`] is rebuilt in full from every snapshot; nothing in it is
//! mutated afterwards. Items without a parseable start date stay in the flat
//! list but are absent from the date index.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::datetime::{format_date_string, format_day_label, parse_date};
use crate::error::{OptionExt, Result};
use crate::merged::MergedItem;
use crate::TimelineConfig;

/// Date-indexed view over one snapshot of merged items.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    items: Vec<MergedItem>,
    /// date string -> positions in `items`, in input order
    items_by_date: HashMap<String, Vec<usize>>,
    /// Distinct days, ascending
    available_dates: Vec<NaiveDate>,
    config: TimelineConfig,
}

impl Timeline {
    /// An empty timeline: every query returns an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from a full snapshot.
    pub fn build(items: Vec<MergedItem>, config: TimelineConfig) -> Self {
        let mut items_by_date: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, item) in items.iter().enumerate() {
            match (item.date_string(), item.start_text()) {
                (Some(key), _) => items_by_date.entry(key).or_default().push(position),
                (None, Some(raw)) => warn!(
                    "[DateIndex] Unparseable start '{}' for segment {}, left undated",
                    raw,
                    item.original_segment_index()
                ),
                (None, None) => {}
            }
        }

        let mut available_dates: Vec<NaiveDate> =
            items_by_date.keys().filter_map(|key| parse_date(key)).collect();
        available_dates.sort_unstable();

        debug!(
            "[DateIndex] Built index: {} items, {} days, {} undated",
            items.len(),
            available_dates.len(),
            items.len() - items_by_date.values().map(Vec::len).sum::<usize>()
        );

        Self {
            items,
            items_by_date,
            available_dates,
            config,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Every merged item, in snapshot order.
    pub fn all_items(&self) -> &[MergedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn number_of_days(&self) -> usize {
        self.available_dates.len()
    }

    /// Distinct days present, ascending.
    pub fn available_dates(&self) -> &[NaiveDate] {
        &self.available_dates
    }

    /// Distinct days as index keys (`yyyy-MM-dd`), ascending.
    pub fn available_date_strings(&self) -> Vec<String> {
        self.available_dates.iter().copied().map(format_date_string).collect()
    }

    /// Day-selector labels using the configured format.
    pub fn day_labels(&self) -> Vec<String> {
        self.available_dates
            .iter()
            .map(|&date| format_day_label(date, &self.config.day_label_format))
            .collect()
    }

    /// Items starting on `date`, in snapshot order.
    pub fn items_for_date(&self, date: NaiveDate) -> Vec<&MergedItem> {
        self.items_for_date_string(&format_date_string(date))
    }

    /// Items for an index key (`yyyy-MM-dd`), exact match.
    pub fn items_for_date_string(&self, key: &str) -> Vec<&MergedItem> {
        self.items_by_date
            .get(key)
            .map(|positions| positions.iter().map(|&p| &self.items[p]).collect())
            .unwrap_or_default()
    }

    /// Items of the `index`-th available day. Out of range yields nothing.
    pub fn items_for_day_index(&self, index: usize) -> Vec<&MergedItem> {
        self.date_for_day_index(index)
            .map(|date| self.items_for_date(date))
            .unwrap_or_default()
    }

    pub fn date_for_day_index(&self, index: usize) -> Option<NaiveDate> {
        self.available_dates.get(index).copied()
    }

    /// Day index of `date`, if any item starts that day.
    pub fn day_index_for(&self, date: NaiveDate) -> Option<usize> {
        self.available_dates.binary_search(&date).ok()
    }

    /// Day lookup for untrusted indices (e.g. from FFI).
    pub fn checked_day(&self, index: i64) -> Result<NaiveDate> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.date_for_day_index(i))
            .ok_or_invalid_day(index, self.number_of_days())
    }

    /// Items with no parseable start date.
    pub fn undated_items(&self) -> Vec<&MergedItem> {
        self.items.iter().filter(|item| item.date_string().is_none()).collect()
    }
}
