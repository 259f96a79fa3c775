use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::competition::CreateCompetitionRequest;
use crate::error::{Result, StorageError};
use crate::models::Competition;

const COMPETITION_COLUMNS: &str =
    "competition_id, name, slug, venue, city, start_date, end_date, created_at";

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions, most recent first
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(&format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions ORDER BY start_date DESC, created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions WHERE competition_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Create a new competition
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            INSERT INTO competitions (name, slug, venue, city, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.venue)
        .bind(&req.city)
        .bind(req.start_date)
        .bind(req.end_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::on_insert(e, || format!("Slug '{}' already exists", req.slug)))?;

        Ok(competition)
    }

    /// Delete a competition by ID; its combined events go with it
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM competitions WHERE competition_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
