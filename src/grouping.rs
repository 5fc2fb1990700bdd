//! City grouping.
//!
//! Partitions a day's items into city groups. The city of the day's first
//! item always leads; the remaining groups follow in first-occurrence order.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::merged::MergedItem;
use crate::timeline::Timeline;

/// Items of one day that share a city.
#[derive(Debug, Clone, Serialize)]
pub struct CityGroup<'a> {
    /// Real city of the group's first item; `None` for the unknown bucket
    pub city: Option<&'a str>,
    pub items: Vec<&'a MergedItem>,
}

impl CityGroup<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Group items by city, primary city first.
///
/// Items without a city share the `unknown_label` bucket.
pub fn group_by_city<'a>(items: &[&'a MergedItem], unknown_label: &str) -> Vec<CityGroup<'a>> {
    if items.is_empty() {
        return Vec::new();
    }

    let key_of = |item: &MergedItem| item.city().unwrap_or(unknown_label).to_string();

    let mut groups: Vec<CityGroup<'a>> = Vec::new();
    let mut slot_by_key: HashMap<String, usize> = HashMap::new();

    // The first item opens bucket 0, so the primary city leads.
    for &item in items {
        let key = key_of(item);
        match slot_by_key.get(&key) {
            Some(&slot) => groups[slot].items.push(item),
            None => {
                slot_by_key.insert(key, groups.len());
                groups.push(CityGroup {
                    city: item.city(),
                    items: vec![item],
                });
            }
        }
    }

    groups
}

impl Timeline {
    /// City groups for `date`; empty when the day has no items.
    pub fn items_grouped_by_city(&self, date: NaiveDate) -> Vec<CityGroup<'_>> {
        group_by_city(&self.items_for_date(date), &self.config().unknown_city_label)
    }

    /// City groups of the `index`-th available day.
    pub fn items_grouped_by_city_for_day(&self, index: usize) -> Vec<CityGroup<'_>> {
        group_by_city(&self.items_for_day_index(index), &self.config().unknown_city_label)
    }
}
