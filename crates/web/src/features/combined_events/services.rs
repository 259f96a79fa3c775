use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use storage::{
    dto::combined_event::{
        CalculatePointsRequest, CombinedEventStatistics, CreateCombinedEventRequest,
        DisciplineUpdateResponse, RankedCombinedEvent, UpdateDisciplineRequest,
    },
    models::{CombinedEvent, Discipline, EventType, Performance},
    repository::{
        athlete::AthleteRepository,
        combined_event::{CombinedEventRepository, DisciplineEntry},
        competition::CompetitionRepository,
    },
    services::{ranking, statistics},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::scoring::ScoringService;

pub fn parse_discipline(code: &str) -> WebResult<Discipline> {
    code.parse()
        .map_err(|e: storage::models::UnknownCodeError| WebError::BadRequest(e.to_string()))
}

/// Enter an athlete into a combined event with every discipline unscored
pub async fn create_combined_event(
    pool: &PgPool,
    request: &CreateCombinedEventRequest,
) -> WebResult<CombinedEvent> {
    request.validate_programme().map_err(WebError::BadRequest)?;

    let athlete = AthleteRepository::new(pool)
        .find_by_id(request.athlete_id)
        .await?;
    if athlete.gender != request.gender {
        return Err(WebError::BadRequest(format!(
            "Athlete is registered as {}, not {}",
            athlete.gender, request.gender
        )));
    }

    CompetitionRepository::new(pool)
        .find_by_id(request.competition_id)
        .await?;

    let event = CombinedEventRepository::new(pool).create(request).await?;
    Ok(event)
}

pub async fn get_combined_event(pool: &PgPool, id: Uuid) -> WebResult<CombinedEvent> {
    let event = CombinedEventRepository::new(pool).find_by_id(id).await?;
    Ok(event)
}

pub async fn list_for_competition(
    pool: &PgPool,
    competition_id: Uuid,
) -> WebResult<Vec<CombinedEvent>> {
    CompetitionRepository::new(pool)
        .find_by_id(competition_id)
        .await?;

    let events = CombinedEventRepository::new(pool)
        .list_by_competition(competition_id)
        .await?;
    Ok(events)
}

pub async fn get_ranking(
    pool: &PgPool,
    competition_id: Uuid,
    event_type: EventType,
) -> WebResult<Vec<RankedCombinedEvent>> {
    CompetitionRepository::new(pool)
        .find_by_id(competition_id)
        .await?;

    let events = CombinedEventRepository::new(pool)
        .list_by_competition_and_type(competition_id, event_type)
        .await?;
    Ok(ranking::rank(events))
}

pub async fn get_statistics(
    pool: &PgPool,
    competition_id: Uuid,
) -> WebResult<CombinedEventStatistics> {
    let events = list_for_competition(pool, competition_id).await?;
    Ok(statistics::summarize(&events))
}

/// Wind is kept only where it affects the result, rounded up to the next
/// tenth of a metre per second.
fn recorded_wind(discipline: Discipline, wind: Option<Decimal>) -> Option<Decimal> {
    wind.filter(|_| discipline.is_wind_affected())
        .map(|w| w.round_dp_with_strategy(1, RoundingStrategy::ToPositiveInfinity))
}

/// Score and store one discipline, returning the result with the new totals.
///
/// The performance is checked before the event is looked up, so a rejected
/// submission leaves the stored result and totals as they were. A malformed
/// performance is therefore a 400 even when `id` names no event.
pub async fn update_discipline(
    pool: &PgPool,
    scoring: &dyn ScoringService,
    id: Uuid,
    discipline: Discipline,
    request: &UpdateDisciplineRequest,
) -> WebResult<DisciplineUpdateResponse> {
    let performance = match request.performance.trim() {
        "" => None,
        raw => Some(Performance::parse(discipline, raw)?),
    };

    let repo = CombinedEventRepository::new(pool);
    let event = repo.find_by_id(id).await?;

    if !event.event_type.includes(discipline) {
        return Err(WebError::BadRequest(format!(
            "{} is not part of the {}",
            discipline, event.event_type
        )));
    }

    let entry = match performance {
        Some(performance) => DisciplineEntry {
            performance: Some(performance.to_string()),
            points: scoring
                .calculate_points(discipline, &performance, event.gender)
                .await?,
            wind: recorded_wind(discipline, request.wind),
            is_valid: true,
        },
        None => DisciplineEntry::cleared(),
    };

    let (result, aggregate) = repo.record_discipline_result(id, discipline, &entry).await?;

    tracing::info!(
        combined_event_id = %id,
        %discipline,
        points = result.points,
        total_points = aggregate.total_points,
        is_complete = aggregate.is_complete,
        "Recorded discipline result"
    );

    Ok(DisciplineUpdateResponse {
        result,
        total_points: aggregate.total_points,
        is_complete: aggregate.is_complete,
    })
}

/// Points a performance would earn, without storing anything
pub async fn calculate_points(
    scoring: &dyn ScoringService,
    request: &CalculatePointsRequest,
) -> WebResult<i32> {
    let performance = Performance::parse(request.discipline, &request.performance)?;
    let points = scoring
        .calculate_points(request.discipline, &performance, request.gender)
        .await?;
    Ok(points)
}

pub fn validate_performance(discipline: Discipline, performance: &str) -> bool {
    Performance::is_valid_for(discipline, performance)
}

pub async fn delete_combined_event(pool: &PgPool, id: Uuid) -> WebResult<()> {
    CombinedEventRepository::new(pool).delete(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_rounds_up_to_the_tenth() {
        let wind = |raw: &str| Some(raw.parse::<Decimal>().unwrap());

        assert_eq!(recorded_wind(Discipline::Run100m, wind("2.03")), wind("2.1"));
        assert_eq!(recorded_wind(Discipline::Run100m, wind("-0.47")), wind("-0.4"));
        assert_eq!(recorded_wind(Discipline::LongJump, wind("1.5")), wind("1.5"));
    }

    #[test]
    fn test_wind_dropped_where_it_does_not_apply() {
        assert_eq!(recorded_wind(Discipline::ShotPut, Some(Decimal::ONE)), None);
        assert_eq!(recorded_wind(Discipline::Run400m, Some(Decimal::ONE)), None);
        assert_eq!(recorded_wind(Discipline::Run200m, None), None);
    }

    #[test]
    fn test_discipline_codes_are_case_insensitive() {
        assert_eq!(parse_discipline("lj").unwrap(), Discipline::LongJump);
        assert!(matches!(parse_discipline("400MH"), Err(WebError::BadRequest(_))));
    }
}
