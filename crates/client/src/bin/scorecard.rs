use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use client::{ApiClient, AthleticsApi, CriticalCollections, RefreshPoller, Scorecard, SharedApi};
use rust_decimal::Decimal;
use storage::dto::combined_event::CreateCombinedEventRequest;
use storage::models::{CombinedEvent, Discipline, EventType, Gender};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "scorecard")]
#[command(about = "Combined-event scorecards from the athletics API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "ATHLETICS_API_URL", default_value = "http://localhost:8080/api")]
    api_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter an athlete into a combined event
    Enter {
        #[arg(long)]
        competition: Uuid,

        #[arg(long)]
        athlete: Uuid,

        #[arg(long)]
        event_type: EventType,

        #[arg(long)]
        gender: Gender,
    },
    /// Print one athlete's scorecard
    Show { id: Uuid },
    /// Record a performance for one discipline
    Submit {
        id: Uuid,

        discipline: Discipline,

        performance: String,

        #[arg(long, allow_hyphen_values = true)]
        wind: Option<Decimal>,
    },
    /// Remove the performance recorded for one discipline
    Clear { id: Uuid, discipline: Discipline },
    /// Check a performance and show the points it would earn
    Check {
        discipline: Discipline,

        performance: String,

        #[arg(long, default_value = "MALE")]
        gender: Gender,
    },
    /// Standings for one event type at a competition
    Ranking {
        competition: Uuid,

        #[arg(long)]
        event_type: EventType,
    },
    /// Completion and points summary for a competition
    Stats { competition: Uuid },
    /// Keep a competition's scorecards on screen, refreshing periodically
    Watch {
        competition: Uuid,

        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
    /// Withdraw a combined event and its results
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("scorecard={},client={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api: SharedApi = Arc::new(
        ApiClient::new(&cli.api_url).context("Failed to build API client")?,
    );

    let outcome = match cli.command {
        Commands::Enter {
            competition,
            athlete,
            event_type,
            gender,
        } => {
            api.create_combined_event(&CreateCombinedEventRequest {
                event_type,
                athlete_id: athlete,
                competition_id: competition,
                gender,
            })
            .await
            .map(|event| {
                println!("Created combined event {}", event.id);
                print_event(&event);
            })
        }
        Commands::Show { id } => Scorecard::load(api, id)
            .await
            .map(|card| print_event(card.event())),
        Commands::Submit {
            id,
            discipline,
            performance,
            wind,
        } => submit(api, id, discipline, &performance, wind).await,
        Commands::Clear { id, discipline } => match Scorecard::load(api, id).await {
            Ok(mut card) => card
                .clear(discipline)
                .await
                .map(|_| print_event(card.event())),
            Err(e) => Err(e),
        },
        Commands::Check {
            discipline,
            performance,
            gender,
        } => check(api.as_ref(), discipline, &performance, gender).await,
        Commands::Ranking {
            competition,
            event_type,
        } => api.ranking(competition, event_type).await.map(|ranking| {
            if ranking.is_empty() {
                println!("No {} entries yet", event_type);
            }
            for entry in ranking {
                let status = if entry.event.is_complete { "" } else { " (in progress)" };
                println!(
                    "{:>3}. {} {:>5} pts{}",
                    entry.position, entry.event.athlete_id, entry.event.total_points, status
                );
            }
        }),
        Commands::Stats { competition } => api.statistics(competition).await.map(|stats| {
            println!(
                "{} events, {} complete, {} in progress",
                stats.total_events, stats.completed_events, stats.in_progress_events
            );
            if let (Some(average), Some(best)) = (stats.average_points, stats.best_points) {
                println!("Average {:.2} pts, best {} pts", average, best);
            }
            for per_type in stats.by_event_type {
                println!(
                    "  {:<22} {:>3} events, {:>3} complete",
                    per_type.event_type, per_type.total_events, per_type.completed_events
                );
            }
        }),
        Commands::Watch {
            competition,
            interval,
        } => {
            watch(api, competition, Duration::from_secs(interval)).await?;
            Ok(())
        }
        Commands::Delete { id } => api
            .delete_combined_event(id)
            .await
            .map(|_| println!("Deleted combined event {}", id)),
    };

    if let Err(e) = outcome {
        tracing::debug!(error = ?e, "Command failed");
        anyhow::bail!(e.user_message());
    }

    Ok(())
}

async fn submit(
    api: SharedApi,
    id: Uuid,
    discipline: Discipline,
    performance: &str,
    wind: Option<Decimal>,
) -> client::Result<()> {
    let mut card = Scorecard::load(api, id).await?;
    let result = card.submit(discipline, performance, wind).await?;
    println!(
        "{} {} -> {} pts",
        result.discipline,
        result.performance.as_deref().unwrap_or("-"),
        result.points
    );
    print_event(card.event());
    Ok(())
}

async fn check(
    api: &dyn AthleticsApi,
    discipline: Discipline,
    performance: &str,
    gender: Gender,
) -> client::Result<()> {
    if !client::feedback::validate_performance(api, discipline, performance).await {
        println!("{} is not a valid {} performance", performance, discipline);
        return Ok(());
    }

    let points = api
        .calculate_points(&storage::dto::combined_event::CalculatePointsRequest {
            discipline,
            performance: performance.to_string(),
            gender,
        })
        .await?;
    println!("{} {} -> {} pts", discipline, performance, points);
    Ok(())
}

async fn watch(api: SharedApi, competition: Uuid, interval: Duration) -> anyhow::Result<()> {
    let collections = Arc::new(CriticalCollections::new(api, competition));
    let mut updates = collections.subscribe();
    let poller = RefreshPoller::spawn(collections, interval);

    tracing::info!("Watching competition {} every {:?}", competition, interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("--- {} combined events ---", snapshot.combined_events.len());
                for event in &snapshot.combined_events {
                    println!(
                        "{} {:<22} {:>5} pts {:>3}%",
                        event.athlete_id,
                        event.event_type,
                        event.total_points,
                        event.progress_percent()
                    );
                }
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

fn print_event(event: &CombinedEvent) {
    println!(
        "{} {} athlete {} ({})",
        event.event_type, event.id, event.athlete_id, event.gender
    );
    for result in &event.results {
        let wind = result
            .wind
            .map(|w| format!(" wind {}", w))
            .unwrap_or_default();
        println!(
            "  {}. {:<6} {:>9} {:>5} pts{}",
            result.day_order,
            result.discipline,
            result.performance.as_deref().unwrap_or("-"),
            result.points,
            wind
        );
    }
    let state = if event.is_complete { "complete" } else { "in progress" };
    println!("Total {} pts ({})", event.total_points, state);
}
