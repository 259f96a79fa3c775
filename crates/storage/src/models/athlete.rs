use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::discipline::Gender;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub birth_date: Option<chrono::NaiveDate>,
    pub club: Option<String>,
    pub country: String,
    pub created_at: chrono::NaiveDateTime,
}
