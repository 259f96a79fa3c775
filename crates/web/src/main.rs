use std::sync::Arc;

use anyhow::Context;
use storage::Database;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;
mod scoring;
mod state;

use config::Config;
use features::{athletes, combined_events, competitions};
use scoring::HttpScoringService;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        competitions::handlers::list_competitions,
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::delete_competition,
        athletes::handlers::list_athletes,
        athletes::handlers::get_athlete,
        athletes::handlers::create_athlete,
        athletes::handlers::delete_athlete,
        combined_events::handlers::create_combined_event,
        combined_events::handlers::get_combined_event,
        combined_events::handlers::list_for_competition,
        combined_events::handlers::get_ranking,
        combined_events::handlers::get_statistics,
        combined_events::handlers::update_discipline,
        combined_events::handlers::calculate_points,
        combined_events::handlers::validate_performance,
        combined_events::handlers::delete_combined_event,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::athlete::CreateAthleteRequest,
            storage::dto::combined_event::CreateCombinedEventRequest,
            storage::dto::combined_event::UpdateDisciplineRequest,
            storage::dto::combined_event::DisciplineUpdateResponse,
            storage::dto::combined_event::CalculatePointsRequest,
            storage::dto::combined_event::PointsResponse,
            storage::dto::combined_event::ValidatePerformanceRequest,
            storage::dto::combined_event::ValidityResponse,
            storage::dto::combined_event::RankedCombinedEvent,
            storage::dto::combined_event::CombinedEventStatistics,
            storage::dto::combined_event::EventTypeStatistics,
            storage::models::Competition,
            storage::models::Athlete,
            storage::models::CombinedEvent,
            storage::models::CombinedEventResult,
            storage::models::Aggregate,
            storage::models::Discipline,
            storage::models::EventType,
            storage::models::Gender,
        )
    ),
    tags(
        (name = "competitions", description = "Competition endpoints"),
        (name = "athletes", description = "Athlete endpoints"),
        (name = "combined-events", description = "Decathlon, heptathlon and pentathlon scorecards"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting athletics API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let scoring = HttpScoringService::new(&config.scoring_service_url, config.scoring_timeout)
        .context("Failed to build scoring service client")?;
    tracing::info!("Scoring service at {}", config.scoring_service_url);

    let state = AppState {
        db,
        scoring: Arc::new(scoring),
    };

    let app = routes::router(state).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
