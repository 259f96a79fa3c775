use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub scoring_service_url: String,
    pub scoring_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            scoring_service_url: std::env::var("SCORING_SERVICE_URL")
                .context("Cannot load SCORING_SERVICE_URL env variable")?,
            scoring_timeout: Duration::from_secs(
                std::env::var("SCORING_TIMEOUT_SECS")
                    .ok()
                    .map(|s| s.parse())
                    .transpose()
                    .context("SCORING_TIMEOUT_SECS must be a number")?
                    .unwrap_or(5),
            ),
        })
    }
}
