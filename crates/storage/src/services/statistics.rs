use crate::dto::combined_event::{CombinedEventStatistics, EventTypeStatistics};
use crate::models::{CombinedEvent, EventType};

/// Summarises the combined events of one competition.
///
/// Averages and best scores only consider completed events.
pub fn summarize(events: &[CombinedEvent]) -> CombinedEventStatistics {
    let completed: Vec<i32> = events
        .iter()
        .filter(|e| e.is_complete)
        .map(|e| e.total_points)
        .collect();

    let by_event_type = EventType::ALL
        .into_iter()
        .filter_map(|event_type| {
            let of_type: Vec<&CombinedEvent> =
                events.iter().filter(|e| e.event_type == event_type).collect();
            if of_type.is_empty() {
                return None;
            }

            let completed: Vec<i32> = of_type
                .iter()
                .filter(|e| e.is_complete)
                .map(|e| e.total_points)
                .collect();

            Some(EventTypeStatistics {
                event_type,
                total_events: of_type.len() as u32,
                completed_events: completed.len() as u32,
                average_points: average(&completed),
                best_points: completed.iter().copied().max(),
            })
        })
        .collect();

    CombinedEventStatistics {
        total_events: events.len() as u32,
        completed_events: completed.len() as u32,
        in_progress_events: (events.len() - completed.len()) as u32,
        average_points: average(&completed),
        best_points: completed.iter().copied().max(),
        by_event_type,
    }
}

fn average(points: &[i32]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let sum: i64 = points.iter().map(|&p| i64::from(p)).sum();
    let mean = sum as f64 / points.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::models::combined_event::fixtures;

    fn event(event_type: EventType, points: i32, complete: bool) -> CombinedEvent {
        let gender = event_type.required_gender().unwrap_or(Gender::Male);
        let mut event = fixtures::event(event_type, gender);
        event.total_points = points;
        event.is_complete = complete;
        event
    }

    #[test]
    fn test_summary_counts_and_averages() {
        let stats = summarize(&[
            event(EventType::Decathlon, 7000, true),
            event(EventType::Decathlon, 7501, true),
            event(EventType::Decathlon, 3000, false),
            event(EventType::Heptathlon, 5800, true),
        ]);

        assert_eq!(stats.total_events, 4);
        assert_eq!(stats.completed_events, 3);
        assert_eq!(stats.in_progress_events, 1);
        assert_eq!(stats.best_points, Some(7501));
        assert_eq!(stats.average_points, Some(6767.0));

        assert_eq!(stats.by_event_type.len(), 2);
        let decathlon = &stats.by_event_type[0];
        assert_eq!(decathlon.event_type, EventType::Decathlon);
        assert_eq!(decathlon.total_events, 3);
        assert_eq!(decathlon.completed_events, 2);
        assert_eq!(decathlon.average_points, Some(7250.5));
    }

    #[test]
    fn test_no_completed_events_has_no_average() {
        let stats = summarize(&[event(EventType::PentathlonIndoor, 2100, false)]);

        assert_eq!(stats.average_points, None);
        assert_eq!(stats.best_points, None);
        assert_eq!(stats.by_event_type[0].completed_events, 0);
    }

    #[test]
    fn test_empty_competition() {
        assert_eq!(summarize(&[]), CombinedEventStatistics::default());
    }
}
