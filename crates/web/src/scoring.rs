//! Client for the external scoring service that turns a performance into
//! combined-event points. The scoring tables themselves live in that service.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storage::models::{Discipline, Gender, Performance};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Scoring service answered with status {0}")]
    Status(u16),

    #[error("Scoring service returned negative points: {0}")]
    InvalidPoints(i32),
}

#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn calculate_points(
        &self,
        discipline: Discipline,
        performance: &Performance,
        gender: Gender,
    ) -> Result<i32, ScoringError>;
}

#[derive(Serialize)]
struct PointsRequest<'a> {
    discipline: Discipline,
    performance: &'a str,
    gender: Gender,
}

#[derive(Deserialize)]
struct PointsReply {
    points: i32,
}

pub struct HttpScoringService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpScoringService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScoringError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn calculate_points(
        &self,
        discipline: Discipline,
        performance: &Performance,
        gender: Gender,
    ) -> Result<i32, ScoringError> {
        let url = format!("{}/points", self.base_url);
        let performance = performance.to_string();

        let response = self
            .client
            .post(&url)
            .json(&PointsRequest {
                discipline,
                performance: &performance,
                gender,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScoringError::Status(response.status().as_u16()));
        }

        let reply = response.json::<PointsReply>().await?;
        if reply.points < 0 {
            return Err(ScoringError::InvalidPoints(reply.points));
        }

        tracing::debug!(%discipline, %performance, %gender, points = reply.points, "Scored performance");

        Ok(reply.points)
    }
}
