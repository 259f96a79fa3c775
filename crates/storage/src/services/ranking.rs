use std::cmp::Ordering;

use crate::dto::combined_event::RankedCombinedEvent;
use crate::models::CombinedEvent;

/// Orders combined events for a ranking table.
///
/// Completed events come first, by total points descending. Equal totals
/// share a position (1, 2, 2, 4) and keep their registration order.
/// Events still in progress follow, ordered the same way, with positions
/// continuing after the last completed entry so they never outrank it.
pub fn rank(events: Vec<CombinedEvent>) -> Vec<RankedCombinedEvent> {
    let (mut completed, mut in_progress): (Vec<_>, Vec<_>) =
        events.into_iter().partition(|e| e.is_complete);

    completed.sort_by(by_points);
    in_progress.sort_by(by_points);

    let offset = completed.len() as u32;
    let mut ranked = assign_positions(completed, 0);
    ranked.extend(assign_positions(in_progress, offset));
    ranked
}

fn by_points(a: &CombinedEvent, b: &CombinedEvent) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

fn assign_positions(sorted: Vec<CombinedEvent>, offset: u32) -> Vec<RankedCombinedEvent> {
    let mut ranked: Vec<RankedCombinedEvent> = Vec::with_capacity(sorted.len());

    for (index, event) in sorted.into_iter().enumerate() {
        let position = match ranked.last() {
            Some(previous) if previous.event.total_points == event.total_points => {
                previous.position
            }
            _ => offset + index as u32 + 1,
        };
        ranked.push(RankedCombinedEvent { event, position });
    }

    ranked
}
