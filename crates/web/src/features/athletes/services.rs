use sqlx::PgPool;
use storage::{
    dto::athlete::{AthleteQuery, CreateAthleteRequest}, error::Result, models::Athlete,
    repository::athlete::AthleteRepository,
};
use uuid::Uuid;

pub async fn list_athletes(pool: &PgPool, query: &AthleteQuery) -> Result<Vec<Athlete>> {
    let repo = AthleteRepository::new(pool);
    repo.list(query.gender).await
}

/// Get athlete by ID
pub async fn get_athlete(pool: &PgPool, id: Uuid) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a new athlete
pub async fn create_athlete(pool: &PgPool, request: &CreateAthleteRequest) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);
    repo.create(request).await
}

/// Delete an athlete
pub async fn delete_athlete(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = AthleteRepository::new(pool);
    repo.delete(id).await
}
