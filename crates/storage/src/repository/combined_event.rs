use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::combined_event::CreateCombinedEventRequest;
use crate::error::{Result, StorageError};
use crate::models::{Aggregate, CombinedEvent, CombinedEventResult, Discipline, EventType};

const EVENT_COLUMNS: &str = "id, event_type, athlete_id, competition_id, gender, total_points, \
                             is_complete, created_at, updated_at";

const RESULT_COLUMNS: &str = "id, combined_event_id, discipline, day_order, performance, points, \
                              wind, is_valid, updated_at";

/// Values written to a single discipline result.
#[derive(Debug, Clone, PartialEq)]
pub struct DisciplineEntry {
    pub performance: Option<String>,
    pub points: i32,
    pub wind: Option<Decimal>,
    pub is_valid: bool,
}

impl DisciplineEntry {
    /// An entry that resets the discipline to its unscored state.
    pub fn cleared() -> Self {
        Self {
            performance: None,
            points: 0,
            wind: None,
            is_valid: false,
        }
    }
}

pub struct CombinedEventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CombinedEventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Creates the event with one unscored result per discipline of its programme.
    pub async fn create(&self, req: &CreateCombinedEventRequest) -> Result<CombinedEvent> {
        let mut tx = self.pool.begin().await?;

        let mut event = sqlx::query_as::<_, CombinedEvent>(&format!(
            r#"
            INSERT INTO combined_events (event_type, athlete_id, competition_id, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(req.event_type.as_str())
        .bind(req.athlete_id)
        .bind(req.competition_id)
        .bind(req.gender.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            StorageError::on_insert(e, || {
                format!(
                    "Athlete is already entered in the {} of this competition",
                    req.event_type
                )
            })
        })?;

        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO combined_event_results (combined_event_id, discipline, day_order) ",
        );
        query.push_values(
            req.event_type.disciplines().iter().enumerate(),
            |mut row, (index, discipline)| {
                row.push_bind(event.id)
                    .push_bind(discipline.code())
                    .push_bind(index as i16 + 1);
            },
        );
        query.push(format!(" RETURNING {RESULT_COLUMNS}"));

        let mut results: Vec<CombinedEventResult> =
            query.build_query_as().fetch_all(&mut *tx).await?;
        results.sort_by_key(|r| r.day_order);

        tx.commit().await?;

        event.results = results;
        Ok(event)
    }

    /// Loads an event with its results in day order.
    pub async fn find_by_id(&self, id: Uuid) -> Result<CombinedEvent> {
        let mut event = sqlx::query_as::<_, CombinedEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM combined_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        event.results = self.results_for(&[id]).await?;
        Ok(event)
    }

    pub async fn list_by_competition(&self, competition_id: Uuid) -> Result<Vec<CombinedEvent>> {
        let events = sqlx::query_as::<_, CombinedEvent>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM combined_events
            WHERE competition_id = $1
            ORDER BY event_type, created_at
            "#
        ))
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_results(events).await
    }

    pub async fn list_by_competition_and_type(
        &self,
        competition_id: Uuid,
        event_type: EventType,
    ) -> Result<Vec<CombinedEvent>> {
        let events = sqlx::query_as::<_, CombinedEvent>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM combined_events
            WHERE competition_id = $1 AND event_type = $2
            ORDER BY created_at
            "#
        ))
        .bind(competition_id)
        .bind(event_type.as_str())
        .fetch_all(self.pool)
        .await?;

        self.attach_results(events).await
    }

    /// Writes one discipline result and refreshes the event totals in the same
    /// transaction.
    ///
    /// The event row is locked first, so concurrent submissions for the same
    /// event are serialised and the stored totals always match the stored
    /// results. The last submission for a discipline wins.
    pub async fn record_discipline_result(
        &self,
        id: Uuid,
        discipline: Discipline,
        entry: &DisciplineEntry,
    ) -> Result<(CombinedEventResult, Aggregate)> {
        let mut tx = self.pool.begin().await?;

        lock_event(&mut tx, id).await?;

        let result = sqlx::query_as::<_, CombinedEventResult>(&format!(
            r#"
            UPDATE combined_event_results
            SET performance = $3, points = $4, wind = $5, is_valid = $6, updated_at = NOW()
            WHERE combined_event_id = $1 AND discipline = $2
            RETURNING {RESULT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(discipline.code())
        .bind(&entry.performance)
        .bind(entry.points)
        .bind(entry.wind)
        .bind(entry.is_valid)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let results = sqlx::query_as::<_, CombinedEventResult>(&format!(
            "SELECT {RESULT_COLUMNS} FROM combined_event_results WHERE combined_event_id = $1"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let aggregate = Aggregate::of(&results);

        sqlx::query(
            r#"
            UPDATE combined_events
            SET total_points = $2, is_complete = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(aggregate.total_points)
        .bind(aggregate.is_complete)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((result, aggregate))
    }

    /// Deletes the event together with all of its results.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM combined_events WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn attach_results(&self, mut events: Vec<CombinedEvent>) -> Result<Vec<CombinedEvent>> {
        if events.is_empty() {
            return Ok(events);
        }

        let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let mut results = self.results_for(&ids).await?;

        for event in &mut events {
            let (own, rest): (Vec<_>, Vec<_>) = results
                .into_iter()
                .partition(|r| r.combined_event_id == event.id);
            event.results = own;
            results = rest;
        }

        Ok(events)
    }

    async fn results_for(&self, ids: &[Uuid]) -> Result<Vec<CombinedEventResult>> {
        let results = sqlx::query_as::<_, CombinedEventResult>(&format!(
            r#"
            SELECT {RESULT_COLUMNS} FROM combined_event_results
            WHERE combined_event_id = ANY($1)
            ORDER BY combined_event_id, day_order
            "#
        ))
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(results)
    }
}

async fn lock_event(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<()> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM combined_events WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)?;

    Ok(())
}
