use std::sync::Arc;

use rust_decimal::Decimal;
use storage::dto::combined_event::{CalculatePointsRequest, UpdateDisciplineRequest};
use storage::models::{CombinedEvent, CombinedEventResult, Discipline, Performance};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::AthleticsApi;
use crate::error::{ClientError, Result};
use crate::feedback;

pub type SharedApi = Arc<dyn AthleticsApi>;

/// One athlete's combined-event scorecard, kept in step with the server as
/// judges enter discipline results.
///
/// A failed call never modifies the scorecard.
pub struct Scorecard {
    api: SharedApi,
    event: CombinedEvent,
}

impl Scorecard {
    pub async fn load(api: SharedApi, id: Uuid) -> Result<Self> {
        let event = api.get_combined_event(id).await?;
        debug!(combined_event_id = %id, results = event.results.len(), "Loaded scorecard");
        Ok(Self { api, event })
    }

    /// Replaces the local copy with the server's.
    pub async fn reload(&mut self) -> Result<()> {
        self.event = self.api.get_combined_event(self.event.id).await?;
        Ok(())
    }

    pub fn event(&self) -> &CombinedEvent {
        &self.event
    }

    pub fn total_points(&self) -> i32 {
        self.event.total_points
    }

    pub fn is_complete(&self) -> bool {
        self.event.is_complete
    }

    pub fn progress_percent(&self) -> u8 {
        self.event.progress_percent()
    }

    /// `false` for illegal values and for any failure to reach the server.
    pub async fn validate_performance(&self, discipline: Discipline, performance: &str) -> bool {
        feedback::validate_performance(self.api.as_ref(), discipline, performance).await
    }

    /// Points the performance would earn for this athlete; nothing is stored.
    pub async fn calculate_points(&self, discipline: Discipline, performance: &str) -> Result<i32> {
        self.api
            .calculate_points(&CalculatePointsRequest {
                discipline,
                performance: performance.to_string(),
                gender: self.event.gender,
            })
            .await
    }

    /// Submits a performance for one discipline and patches the scorecard
    /// with the stored result and the event totals returned by the server.
    pub async fn submit(
        &mut self,
        discipline: Discipline,
        performance: &str,
        wind: Option<Decimal>,
    ) -> Result<&CombinedEventResult> {
        if !self.event.event_type.includes(discipline) {
            return Err(ClientError::Rejected(format!(
                "{} is not part of the {}",
                discipline, self.event.event_type
            )));
        }
        if !performance.trim().is_empty() {
            Performance::parse(discipline, performance)
                .map_err(|e| ClientError::Rejected(e.to_string()))?;
        }

        let response = self
            .api
            .update_discipline(
                self.event.id,
                discipline,
                &UpdateDisciplineRequest {
                    performance: performance.trim().to_string(),
                    wind,
                },
            )
            .await?;

        self.event.apply_result(response.result);

        if self.event.total_points != response.total_points
            || self.event.is_complete != response.is_complete
        {
            warn!(
                combined_event_id = %self.event.id,
                local_total = self.event.total_points,
                server_total = response.total_points,
                "Scorecard diverged from server totals; using the server's"
            );
            self.event.total_points = response.total_points;
            self.event.is_complete = response.is_complete;
        }

        self.event
            .result_for(discipline)
            .ok_or_else(|| ClientError::Rejected(format!("{discipline} missing from scorecard")))
    }

    /// Resets a discipline to its unscored state.
    pub async fn clear(&mut self, discipline: Discipline) -> Result<()> {
        self.submit(discipline, "", None).await?;
        Ok(())
    }
}
