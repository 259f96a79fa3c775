use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::discipline::{Discipline, EventType, Gender};

/// One athlete's participation in a multi-discipline event at a competition.
///
/// `total_points` and `is_complete` are derived from `results`; see
/// [`Aggregate::of`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEvent {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub event_type: EventType,
    pub athlete_id: Uuid,
    pub competition_id: Uuid,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub total_points: i32,
    pub is_complete: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[sqlx(skip)]
    #[serde(default)]
    pub results: Vec<CombinedEventResult>,
}

/// One discipline's outcome inside a [`CombinedEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEventResult {
    pub id: Uuid,
    pub combined_event_id: Uuid,
    #[sqlx(try_from = "String")]
    pub discipline: Discipline,
    pub day_order: i16,
    pub performance: Option<String>,
    pub points: i32,
    pub wind: Option<Decimal>,
    pub is_valid: bool,
    pub updated_at: NaiveDateTime,
}

/// Derived totals of a combined event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub total_points: i32,
    pub is_complete: bool,
}

impl Aggregate {
    /// Sum of points over valid results; complete once every result is valid.
    pub fn of<'a>(results: impl IntoIterator<Item = &'a CombinedEventResult>) -> Self {
        let mut total_points = 0;
        let mut seen = 0usize;
        let mut valid = 0usize;

        for result in results {
            seen += 1;
            if result.is_valid {
                valid += 1;
                total_points += result.points;
            }
        }

        Self {
            total_points,
            is_complete: seen > 0 && seen == valid,
        }
    }
}

impl CombinedEvent {
    pub fn aggregate(&self) -> Aggregate {
        Aggregate {
            total_points: self.total_points,
            is_complete: self.is_complete,
        }
    }

    pub fn recompute_aggregate(&mut self) -> Aggregate {
        let aggregate = Aggregate::of(&self.results);
        self.total_points = aggregate.total_points;
        self.is_complete = aggregate.is_complete;
        aggregate
    }

    /// Replaces the result for `result.discipline` and recomputes the totals.
    ///
    /// Returns `false` and leaves the event untouched when the discipline is
    /// not part of this event.
    pub fn apply_result(&mut self, result: CombinedEventResult) -> bool {
        let Some(slot) = self
            .results
            .iter_mut()
            .find(|r| r.discipline == result.discipline)
        else {
            return false;
        };

        *slot = result;
        self.recompute_aggregate();
        true
    }

    pub fn result_for(&self, discipline: Discipline) -> Option<&CombinedEventResult> {
        self.results.iter().find(|r| r.discipline == discipline)
    }

    pub fn completed_disciplines(&self) -> usize {
        self.results.iter().filter(|r| r.is_valid).count()
    }

    /// Share of disciplines with a valid result, 0..=100.
    pub fn progress_percent(&self) -> u8 {
        if self.results.is_empty() {
            return 0;
        }
        (self.completed_disciplines() * 100 / self.results.len()) as u8
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn event(event_type: EventType, gender: Gender) -> CombinedEvent {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now().naive_utc();
        let results = event_type
            .disciplines()
            .iter()
            .enumerate()
            .map(|(index, discipline)| CombinedEventResult {
                id: Uuid::new_v4(),
                combined_event_id: id,
                discipline: *discipline,
                day_order: index as i16 + 1,
                performance: None,
                points: 0,
                wind: None,
                is_valid: false,
                updated_at: now,
            })
            .collect();

        CombinedEvent {
            id,
            event_type,
            athlete_id: Uuid::new_v4(),
            competition_id: Uuid::new_v4(),
            gender,
            total_points: 0,
            is_complete: false,
            created_at: now,
            updated_at: now,
            results,
        }
    }

    pub fn scored(event: &CombinedEvent, discipline: Discipline, points: i32) -> CombinedEventResult {
        let mut result = event
            .result_for(discipline)
            .cloned()
            .expect("discipline belongs to the event");
        result.performance = Some("1.00".to_string());
        result.points = points;
        result.is_valid = true;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{event, scored};
    use super::*;

    #[test]
    fn test_partial_event_is_incomplete() {
        let mut event = event(EventType::PentathlonOutdoor, Gender::Male);
        let first = scored(&event, Discipline::LongJump, 812);

        assert!(event.apply_result(first));
        assert_eq!(event.total_points, 812);
        assert!(!event.is_complete);
        assert_eq!(event.progress_percent(), 20);
    }

    #[test]
    fn test_scoring_every_discipline_completes_the_event() {
        let mut event = event(EventType::PentathlonOutdoor, Gender::Male);
        let points = [812, 640, 701, 655, 590];

        for (discipline, points) in EventType::PentathlonOutdoor.disciplines().iter().zip(points) {
            let result = scored(&event, *discipline, points);
            event.apply_result(result);
            assert_eq!(event.aggregate(), Aggregate::of(&event.results));
        }

        assert!(event.is_complete);
        assert_eq!(event.total_points, points.iter().sum::<i32>());
        assert_eq!(event.progress_percent(), 100);
    }

    #[test]
    fn test_clearing_a_result_reopens_the_event() {
        let mut event = event(EventType::PentathlonU16Female, Gender::Female);
        for discipline in EventType::PentathlonU16Female.disciplines() {
            let result = scored(&event, *discipline, 500);
            event.apply_result(result);
        }
        assert!(event.is_complete);

        let mut cleared = event.result_for(Discipline::ShotPut).cloned().unwrap();
        cleared.performance = None;
        cleared.points = 0;
        cleared.is_valid = false;
        event.apply_result(cleared);

        assert!(!event.is_complete);
        assert_eq!(event.total_points, 2000);
    }

    #[test]
    fn test_invalid_results_do_not_count() {
        let mut event = event(EventType::Heptathlon, Gender::Female);
        let mut result = scored(&event, Discipline::HighJump, 900);
        result.is_valid = false;
        event.apply_result(result);

        assert_eq!(event.total_points, 0);
    }

    #[test]
    fn test_unknown_discipline_leaves_event_untouched() {
        let mut event = event(EventType::Heptathlon, Gender::Female);
        let mut foreign = scored(&event, Discipline::HighJump, 900);
        foreign.discipline = Discipline::PoleVault;

        assert!(!event.apply_result(foreign));
        assert_eq!(event.total_points, 0);
        assert!(event.results.iter().all(|r| !r.is_valid));
    }

    #[test]
    fn test_empty_event_is_never_complete() {
        assert_eq!(
            Aggregate::of(&Vec::<CombinedEventResult>::new()),
            Aggregate {
                total_points: 0,
                is_complete: false
            }
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let event = event(EventType::Decathlon, Gender::Male);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "DECATHLON");
        assert_eq!(json["totalPoints"], 0);
        assert_eq!(json["isComplete"], false);
        assert_eq!(json["results"][0]["discipline"], "100M");
        assert_eq!(json["results"][0]["isValid"], false);
    }
}
