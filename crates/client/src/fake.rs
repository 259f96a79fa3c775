//! In-memory [`AthleticsApi`] that behaves like the server for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storage::dto::combined_event::{
    CalculatePointsRequest, CombinedEventStatistics, CreateCombinedEventRequest,
    DisciplineUpdateResponse, RankedCombinedEvent, UpdateDisciplineRequest,
};
use storage::models::{
    CombinedEvent, CombinedEventResult, Competition, Discipline, EventType, Gender, Performance,
};
use storage::services::{ranking, statistics};
use uuid::Uuid;

use crate::api::AthleticsApi;
use crate::error::{ClientError, Result};

#[derive(Default)]
pub struct FakeApi {
    events: Mutex<HashMap<Uuid, CombinedEvent>>,
    offline: AtomicBool,
    update_calls: AtomicUsize,
    list_calls: AtomicUsize,
    validated: Mutex<Vec<String>>,
    calculated: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// One point per hundredth or centimetre keeps expected totals easy to read.
fn points_for(performance: &Performance) -> i32 {
    performance.value() as i32
}

impl FakeApi {
    /// Seeds an event in the nil competition with every discipline unscored.
    pub fn seed_event(&self, event_type: EventType, gender: Gender) -> Uuid {
        let event = new_event(event_type, Uuid::new_v4(), Uuid::nil(), gender);
        let id = event.id;
        self.events.lock().unwrap().insert(id, event);
        id
    }

    /// Scores a discipline behind the client's back.
    pub fn score_directly(&self, id: Uuid, discipline: Discipline, points: i32) {
        let mut events = self.events.lock().unwrap();
        let event = events.get_mut(&id).unwrap();
        let mut result = event.result_for(discipline).cloned().unwrap();
        result.performance = Some("1.00".to_string());
        result.points = points;
        result.is_valid = true;
        event.apply_result(result);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delays answers about `performance` by `delay`.
    pub fn delay(&self, performance: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(performance.to_string(), delay);
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Performances sent to `validate_performance`, in call order.
    pub fn validated(&self) -> Vec<String> {
        self.validated.lock().unwrap().clone()
    }

    /// Performances sent to `calculate_points`, in call order.
    pub fn calculated(&self) -> Vec<String> {
        self.calculated.lock().unwrap().clone()
    }

    fn reachable(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Server {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn lag(&self, performance: &str) {
        let delay = self.delays.lock().unwrap().get(performance).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn event(&self, id: Uuid) -> Result<CombinedEvent> {
        self.events
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    fn in_competition(&self, competition_id: Uuid) -> Vec<CombinedEvent> {
        let mut events: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.competition_id == competition_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.created_at);
        events
    }
}

fn new_event(
    event_type: EventType,
    athlete_id: Uuid,
    competition_id: Uuid,
    gender: Gender,
) -> CombinedEvent {
    let id = Uuid::new_v4();
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
            updated_at: now(),
        })
        .collect();

    CombinedEvent {
        id,
        event_type,
        athlete_id,
        competition_id,
        gender,
        total_points: 0,
        is_complete: false,
        created_at: now(),
        updated_at: now(),
        results,
    }
}

#[async_trait]
impl AthleticsApi for FakeApi {
    async fn list_competitions(&self) -> Result<Vec<Competition>> {
        self.reachable()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn get_combined_event(&self, id: Uuid) -> Result<CombinedEvent> {
        self.reachable()?;
        self.event(id)
    }

    async fn list_combined_events(&self, competition_id: Uuid) -> Result<Vec<CombinedEvent>> {
        self.reachable()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.in_competition(competition_id))
    }

    async fn ranking(
        &self,
        competition_id: Uuid,
        event_type: EventType,
    ) -> Result<Vec<RankedCombinedEvent>> {
        self.reachable()?;
        let events = self
            .in_competition(competition_id)
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect();
        Ok(ranking::rank(events))
    }

    async fn statistics(&self, competition_id: Uuid) -> Result<CombinedEventStatistics> {
        self.reachable()?;
        Ok(statistics::summarize(&self.in_competition(competition_id)))
    }

    async fn create_combined_event(
        &self,
        request: &CreateCombinedEventRequest,
    ) -> Result<CombinedEvent> {
        self.reachable()?;
        request.validate_programme().map_err(ClientError::Rejected)?;
        let event = new_event(
            request.event_type,
            request.athlete_id,
            request.competition_id,
            request.gender,
        );
        self.events.lock().unwrap().insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_discipline(
        &self,
        id: Uuid,
        discipline: Discipline,
        request: &UpdateDisciplineRequest,
    ) -> Result<DisciplineUpdateResponse> {
        self.reachable()?;
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let performance = if request.performance.trim().is_empty() {
            None
        } else {
            Some(
                Performance::parse(discipline, &request.performance)
                    .map_err(|e| ClientError::Rejected(e.to_string()))?,
            )
        };

        let mut events = self.events.lock().unwrap();
        let event = events.get_mut(&id).ok_or(ClientError::NotFound)?;
        let mut result = event
            .result_for(discipline)
            .cloned()
            .ok_or_else(|| ClientError::Rejected(format!("{discipline} is not in this event")))?;

        result.points = performance.as_ref().map(points_for).unwrap_or(0);
        result.is_valid = performance.is_some();
        result.performance = performance.map(|p| p.to_string());
        result.wind = request.wind.filter(|_| discipline.is_wind_affected());
        result.updated_at = now();
        event.apply_result(result.clone());

        Ok(DisciplineUpdateResponse {
            result,
            total_points: event.total_points,
            is_complete: event.is_complete,
        })
    }

    async fn calculate_points(&self, request: &CalculatePointsRequest) -> Result<i32> {
        self.calculated
            .lock()
            .unwrap()
            .push(request.performance.clone());
        self.lag(&request.performance).await;
        self.reachable()?;
        let performance = Performance::parse(request.discipline, &request.performance)
            .map_err(|e| ClientError::Rejected(e.to_string()))?;
        Ok(points_for(&performance))
    }

    async fn validate_performance(&self, discipline: Discipline, performance: &str) -> Result<bool> {
        self.validated.lock().unwrap().push(performance.to_string());
        self.lag(performance).await;
        self.reachable()?;
        Ok(Performance::is_valid_for(discipline, performance))
    }

    async fn delete_combined_event(&self, id: Uuid) -> Result<()> {
        self.reachable()?;
        self.events
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(ClientError::NotFound)
    }
}
