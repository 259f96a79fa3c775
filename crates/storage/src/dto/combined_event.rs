use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CombinedEvent, CombinedEventResult, Discipline, EventType, Gender};

/// Request payload for entering an athlete into a combined event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCombinedEventRequest {
    pub event_type: EventType,
    pub athlete_id: Uuid,
    pub competition_id: Uuid,
    pub gender: Gender,
}

impl CreateCombinedEventRequest {
    /// Gender-specific programmes only accept athletes of that gender.
    pub fn validate_programme(&self) -> Result<(), String> {
        match self.event_type.required_gender() {
            Some(required) if required != self.gender => Err(format!(
                "{} is contested by {} athletes only",
                self.event_type, required
            )),
            _ => Ok(()),
        }
    }
}

/// Performance submitted by a judge for one discipline.
///
/// An empty `performance` clears the discipline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDisciplineRequest {
    #[validate(length(max = 16, message = "Performance must be at most 16 characters"))]
    pub performance: String,

    #[validate(custom(function = "validate_wind"))]
    pub wind: Option<Decimal>,
}

fn validate_wind(wind: &Decimal) -> Result<(), validator::ValidationError> {
    if wind.abs() <= Decimal::from(20) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_wind"))
    }
}

/// Updated discipline result together with the event totals it produced.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineUpdateResponse {
    pub result: CombinedEventResult,
    pub total_points: i32,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePointsRequest {
    pub discipline: Discipline,
    pub performance: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PointsResponse {
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePerformanceRequest {
    pub discipline: Discipline,
    pub performance: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidityResponse {
    pub is_valid: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RankingQuery {
    pub event_type: EventType,
}

/// A combined event annotated with its 1-based place in the ranking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedCombinedEvent {
    #[serde(flatten)]
    pub event: CombinedEvent,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEventStatistics {
    pub total_events: u32,
    pub completed_events: u32,
    pub in_progress_events: u32,
    pub average_points: Option<f64>,
    pub best_points: Option<i32>,
    pub by_event_type: Vec<EventTypeStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeStatistics {
    pub event_type: EventType,
    pub total_events: u32,
    pub completed_events: u32,
    pub average_points: Option<f64>,
    pub best_points: Option<i32>,
}
