//! End-to-end scenarios: trip JSON in, timeline queries out.

use chrono::NaiveDate;
use serde_json::json;
use trip_timeline::{
    merge_trip, MergedItem, SequentialPlans, Timeline, TimelineConfig, TimelineEngine, Trip,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn trip(value: serde_json::Value) -> Trip {
    init_logging();
    Trip::from_json(&value.to_string()).unwrap()
}

fn timeline(value: serde_json::Value) -> Timeline {
    Timeline::build(
        merge_trip(&trip(value), &SequentialPlans),
        TimelineConfig::default(),
    )
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn mixed_trip() -> serde_json::Value {
    json!({
        "id": "trip-mixed",
        "tripHash": "h1",
        "city": "Paris",
        "segments": [
            {"segmentType": "itinerary", "startDate": "2025-03-11 09:00", "title": "Day 2", "city": "Lyon"},
            {"segmentType": "itinerary", "startDate": "2025-03-10 10:00:00", "title": "Day 1", "city": "Paris"},
            {"segmentType": "bookedActivity", "additionalData": {"bookingId": "B1", "startDatetime": "2025-03-10 09:00:00"}},
            {"segmentType": "manualPoi", "title": "No date"},
            {"segmentType": "reservedActivity", "city": "Paris", "additionalData": {"activityId": "A7", "startDatetime": "2025-03-12"}},
            {"segmentType": "manualPoi", "startDate": "2025-03-10 20:00", "title": "Dinner", "city": "Versailles"}
        ],
        "plans": [
            {"id": "p0", "city": "Lyon", "generatedStatus": 1, "steps": [{"id": 1, "poi": {"id": "l1"}}]},
            {"id": "p1", "generatedStatus": 1, "steps": [{"id": 2, "poi": {"id": "x"}}, {"id": 3, "poi": {"id": "y"}}]},
            {"id": "p2", "generatedStatus": -1, "steps": []},
            {"id": "p3", "generatedStatus": 1, "steps": [{"id": 4, "poi": {"id": "dinner"}}]}
        ]
    })
}

fn indices(items: &[&MergedItem]) -> Vec<usize> {
    items.iter().map(|i| i.original_segment_index()).collect()
}

#[test]
fn scenario_a_itinerary_and_booking_same_day() {
    let timeline = timeline(json!({
        "id": "trip-a",
        "segments": [
            {"segmentType": "itinerary", "startDate": "2025-03-10", "city": "Paris"},
            {"segmentType": "bookedActivity", "additionalData": {"bookingId": "B1", "startDatetime": "2025-03-10 09:00:00"}}
        ],
        "plans": [
            {"id": "p1", "generatedStatus": 1, "steps": [
                {"id": 1, "order": 0, "poi": {"id": "X"}},
                {"id": 2, "order": 1, "poi": {"id": "Y"}}
            ]}
        ]
    }));

    assert_eq!(timeline.available_dates(), &[march(10)]);
    assert_eq!(timeline.items_for_date(march(10)).len(), 2);

    let pois: Vec<&str> = timeline
        .all_pois(march(10))
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(pois, vec!["X", "Y"]);
    assert_eq!(timeline.booked_activities(march(10)).len(), 1);
}

#[test]
fn scenario_b_city_groups() {
    let timeline = timeline(json!({
        "id": "trip-b",
        "segments": [
            {"segmentType": "itinerary", "startDate": "2025-03-10", "title": "Museums", "city": "Paris"},
            {"segmentType": "itinerary", "startDate": "2025-03-10", "title": "Parks", "city": "Paris"},
            {"segmentType": "bookedActivity", "additionalData": {"bookingId": "B1", "startDatetime": "2025-03-10 15:00:00"}}
        ]
    }));

    let groups = timeline.items_grouped_by_city(march(10));
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].city, Some("Paris"));
    assert_eq!(indices(&groups[0].items), vec![0, 1]);
    assert_eq!(groups[1].city, None);
    assert_eq!(indices(&groups[1].items), vec![2]);
}

#[test]
fn scenario_c_empty_update() {
    let mut engine = TimelineEngine::new();
    engine.update(Vec::new());

    assert!(engine.is_empty());
    assert_eq!(engine.number_of_days(), 0);

    let timeline = engine.snapshot();
    for day in 0..3 {
        assert!(timeline.items_for_day_index(day).is_empty());
        assert!(timeline.items_grouped_by_city_for_day(day).is_empty());
        assert!(timeline.item_at(0, 0, day).is_none());
    }
    assert!(timeline.all_booked_activities().is_empty());
    assert!(engine.get_poi("anything").is_none());
}

#[test]
fn scenario_d_manual_poi_without_steps() {
    let timeline = timeline(json!({
        "id": "trip-d",
        "segments": [
            {"segmentType": "manualPoi", "startDate": "2025-03-10 12:00", "poiId": "poi-9"}
        ],
        "plans": [{"id": "p1", "generatedStatus": 0, "steps": []}]
    }));

    let item = timeline.items_for_date(march(10))[0];
    assert!(item.plan().is_some());
    assert!(item.get_all_pois().is_empty());
    assert!(item.manual_poi().is_none());
    assert!(timeline.all_pois(march(10)).is_empty());
    assert!(timeline.pois_grouped_by_segment(march(10)).is_empty());
}

#[test]
fn property_partition_matches_flat_list() {
    let timeline = timeline(mixed_trip());

    for &date in timeline.available_dates() {
        let key = date.format("%Y-%m-%d").to_string();
        let expected: Vec<usize> = timeline
            .all_items()
            .iter()
            .filter(|item| item.date_string().as_deref() == Some(key.as_str()))
            .map(|item| item.original_segment_index())
            .collect();
        assert_eq!(indices(&timeline.items_for_date(date)), expected);
    }
}

#[test]
fn property_coverage_of_dated_items() {
    let timeline = timeline(mixed_trip());

    let mut covered: Vec<usize> = (0..timeline.number_of_days())
        .flat_map(|d| indices(&timeline.items_for_day_index(d)))
        .collect();
    covered.sort_unstable();

    let dated: Vec<usize> = timeline
        .all_items()
        .iter()
        .filter(|item| item.date_string().is_some())
        .map(|item| item.original_segment_index())
        .collect();

    assert_eq!(covered, dated);
    assert_eq!(timeline.all_items().len(), 6);
    assert_eq!(indices(&timeline.undated_items()), vec![3]);
    assert_eq!(timeline.available_dates(), &[march(10), march(11), march(12)]);
}

#[test]
fn property_city_groups_partition_day() {
    let timeline = timeline(mixed_trip());

    for &date in timeline.available_dates() {
        let day = timeline.items_for_date(date);
        let groups = timeline.items_grouped_by_city(date);

        let mut grouped: Vec<usize> = groups.iter().flat_map(|g| indices(&g.items)).collect();
        grouped.sort_unstable();
        let mut flat = indices(&day);
        flat.sort_unstable();

        assert_eq!(grouped, flat);
        assert_eq!(groups[0].city, day[0].city());
    }
}

#[test]
fn property_idempotent_rebuild() {
    let items = merge_trip(&trip(mixed_trip()), &SequentialPlans);

    let mut engine = TimelineEngine::new();
    engine.update(items.clone());
    let first = engine.snapshot();
    engine.update(items);
    let second = engine.snapshot();

    assert_eq!(first.available_dates(), second.available_dates());
    for day in 0..first.number_of_days() {
        assert_eq!(
            indices(&first.items_for_day_index(day)),
            indices(&second.items_for_day_index(day))
        );
    }
}

#[test]
fn property_unique_id_is_stable() {
    let a = merge_trip(&trip(mixed_trip()), &SequentialPlans);
    let b = merge_trip(&trip(mixed_trip()), &SequentialPlans);

    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.unique_id(), y.unique_id());
        assert_eq!(x, y);
    }
    assert_eq!(a[2].unique_id(), "booking:B1");
    assert_eq!(a[4].unique_id(), "activity:A7:2025-03-12");
    assert_eq!(a[3].unique_id(), "index:3");
}

#[test]
fn routing_gets_one_group_per_segment() {
    let timeline = timeline(mixed_trip());
    let groups = timeline.pois_grouped_by_segment(march(10));

    let ids: Vec<Vec<&str>> = groups
        .iter()
        .map(|g| g.iter().map(|p| p.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["x", "y"], vec!["dinner"]]);
}

#[test]
fn engine_updates_from_trip() {
    let mut engine = TimelineEngine::new();
    engine.update_with_trip(&trip(mixed_trip()));

    assert_eq!(engine.number_of_days(), 3);
    assert_eq!(engine.stats().undated_item_count, 1);
    assert_eq!(engine.stats().booked_activity_count, 2);
    assert!(engine.select_day(2));
    assert!(engine.get_booked_activity("A7").is_some());
}
