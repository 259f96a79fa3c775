use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::athlete::CreateAthleteRequest;
use crate::error::{Result, StorageError};
use crate::models::{Athlete, Gender};

const ATHLETE_COLUMNS: &str =
    "athlete_id, first_name, last_name, gender, birth_date, club, country, created_at";

pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Lists athletes alphabetically, optionally only one gender
    pub async fn list(&self, gender: Option<Gender>) -> Result<Vec<Athlete>> {
        let athletes = sqlx::query_as::<_, Athlete>(&format!(
            r#"
            SELECT {ATHLETE_COLUMNS} FROM athletes
            WHERE $1::VARCHAR IS NULL OR gender = $1
            ORDER BY last_name, first_name
            "#
        ))
        .bind(gender.map(|g| g.as_str()))
        .fetch_all(self.pool)
        .await?;

        Ok(athletes)
    }

    /// Find athlete by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes WHERE athlete_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    pub async fn create(&self, req: &CreateAthleteRequest) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            r#"
            INSERT INTO athletes (first_name, last_name, gender, birth_date, club, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ATHLETE_COLUMNS}
            "#
        ))
        .bind(req.first_name.trim())
        .bind(req.last_name.trim())
        .bind(req.gender.as_str())
        .bind(req.birth_date)
        .bind(&req.club)
        .bind(&req.country)
        .fetch_one(self.pool)
        .await?;

        Ok(athlete)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM athletes WHERE athlete_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
