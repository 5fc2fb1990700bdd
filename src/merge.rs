//! Merge engine: pairs each segment with its correlated plan.
//!
//! Produces one [`MergedItem`] per segment, in segment order, stamping each
//! with its zero-based position in the input list. Which plan belongs to
//! which segment is decided upstream and expressed through a
//! [`PlanResolver`].

use std::collections::HashSet;

use log::{debug, warn};

use crate::merged::MergedItem;
use crate::model::{Plan, Segment, Trip};

/// Correlates plans with segments.
pub trait PlanResolver {
    /// For every segment, the index into `plans` of its correlated plan.
    ///
    /// Missing trailing entries and out-of-range indices mean "no plan".
    fn resolve(&self, segments: &[Segment], plans: &[Plan]) -> Vec<Option<usize>>;
}

/// The n-th segment that accepts a plan receives the n-th plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialPlans;

impl PlanResolver for SequentialPlans {
    fn resolve(&self, segments: &[Segment], plans: &[Plan]) -> Vec<Option<usize>> {
        let mut next_plan = 0;
        segments
            .iter()
            .map(|segment| {
                if !segment.segment_type.accepts_plan() {
                    return None;
                }
                let slot = next_plan;
                next_plan += 1;
                (slot < plans.len()).then_some(slot)
            })
            .collect()
    }
}

/// Plan ids already paired with segments upstream, one entry per segment.
#[derive(Debug, Clone, Default)]
pub struct PlanIds(pub Vec<Option<String>>);

impl PlanResolver for PlanIds {
    fn resolve(&self, segments: &[Segment], plans: &[Plan]) -> Vec<Option<usize>> {
        (0..segments.len())
            .map(|i| {
                let plan_id = self.0.get(i)?.as_deref()?;
                let found = plans.iter().position(|p| p.id == plan_id);
                if found.is_none() {
                    debug!("[MergeEngine] Plan {} for segment {} not in snapshot", plan_id, i);
                }
                found
            })
            .collect()
    }
}

/// Merge segments that already carry their plan.
///
/// The position in `pairs` becomes the original segment index.
pub fn merge_resolved<I>(pairs: I) -> Vec<MergedItem>
where
    I: IntoIterator<Item = (Segment, Option<Plan>)>,
{
    pairs
        .into_iter()
        .enumerate()
        .map(|(index, (segment, plan))| {
            if !segment.is_consistent() {
                warn!(
                    "[MergeEngine] Segment {} ({:?}) has inconsistent booking data",
                    index, segment.segment_type
                );
            }
            MergedItem::new(segment, plan, index)
        })
        .collect()
}

/// Merge raw segments with plans correlated by `resolver`.
pub fn merge_segments<R>(segments: &[Segment], plans: &[Plan], resolver: &R) -> Vec<MergedItem>
where
    R: PlanResolver + ?Sized,
{
    let slots = resolver.resolve(segments, plans);

    let pairs = segments.iter().enumerate().map(|(i, segment)| {
        let plan = slots
            .get(i)
            .copied()
            .flatten()
            .and_then(|slot| plans.get(slot))
            .cloned();
        (segment.clone(), plan)
    });

    let items = merge_resolved(pairs);
    debug!(
        "[MergeEngine] Merged {} segments with {} plans ({} paired)",
        segments.len(),
        plans.len(),
        items.iter().filter(|i| i.plan().is_some()).count()
    );
    items
}

/// Merge a whole trip snapshot.
pub fn merge_trip<R>(trip: &Trip, resolver: &R) -> Vec<MergedItem>
where
    R: PlanResolver + ?Sized,
{
    merge_segments(trip.segments(), trip.plans(), resolver)
}

/// Keep the first item for every unique id, preserving order.
pub fn dedup_by_unique_id(items: Vec<MergedItem>) -> Vec<MergedItem> {
    let before = items.len();
    let mut seen = HashSet::new();
    let kept: Vec<MergedItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.unique_id()))
        .collect();

    if kept.len() < before {
        debug!("[MergeEngine] Dropped {} duplicate items", before - kept.len());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdditionalData, SegmentType, Step};

    fn segment(segment_type: SegmentType) -> Segment {
        let mut seg = Segment::new(segment_type);
        if segment_type.is_booking() {
            seg.additional_data = Some(AdditionalData::default());
        }
        seg
    }

    fn plans(n: usize) -> Vec<Plan> {
        (0..n)
            .map(|i| Plan::new(format!("plan-{}", i), vec![Step::new(i as i64, None)]))
            .collect()
    }

    #[test]
    fn test_one_item_per_segment_in_order() {
        let segments = vec![
            segment(SegmentType::Itinerary),
            segment(SegmentType::BookedActivity),
            segment(SegmentType::ManualPoi),
            segment(SegmentType::ReservedActivity),
        ];
        let items = merge_segments(&segments, &plans(2), &SequentialPlans);

        assert_eq!(items.len(), 4);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.original_segment_index(), i);
            assert_eq!(item.segment_type(), segments[i].segment_type);
        }
        assert_eq!(items[0].plan().map(|p| p.id.as_str()), Some("plan-0"));
        assert!(items[1].plan().is_none());
        assert_eq!(items[2].plan().map(|p| p.id.as_str()), Some("plan-1"));
        assert!(items[3].plan().is_none());
    }

    #[test]
    fn test_sequential_runs_out_of_plans() {
        let segments = vec![segment(SegmentType::Itinerary), segment(SegmentType::Itinerary)];
        let items = merge_segments(&segments, &plans(1), &SequentialPlans);
        assert!(items[0].plan().is_some());
        assert!(items[1].plan().is_none());
    }

    #[test]
    fn test_plan_ids_resolver() {
        let segments = vec![
            segment(SegmentType::Itinerary),
            segment(SegmentType::Itinerary),
            segment(SegmentType::BookedActivity),
        ];
        let resolver = PlanIds(vec![
            Some("plan-1".to_string()),
            Some("missing".to_string()),
            Some("plan-0".to_string()),
        ]);
        let items = merge_segments(&segments, &plans(2), &resolver);

        assert_eq!(items[0].plan().map(|p| p.id.as_str()), Some("plan-1"));
        assert!(items[1].plan().is_none());
        // Bookings never keep a plan, even when one is offered
        assert!(items[2].plan().is_none());
    }

    #[test]
    fn test_merge_resolved_indices() {
        let items = merge_resolved(vec![
            (segment(SegmentType::ManualPoi), None),
            (segment(SegmentType::Itinerary), Some(plans(1).remove(0))),
        ]);
        assert_eq!(items[1].original_segment_index(), 1);
        assert!(items[1].plan().is_some());
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut a = segment(SegmentType::Itinerary);
        a.start_date = Some("2025-03-10".to_string());
        a.title = Some("Louvre".to_string());
        let b = a.clone();
        let c = segment(SegmentType::Itinerary);

        let items = merge_resolved(vec![(a, None), (b, None), (c, None)]);
        let kept = dedup_by_unique_id(items);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].original_segment_index(), 0);
        assert_eq!(kept[1].original_segment_index(), 2);
    }
}
