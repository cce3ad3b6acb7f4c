//! Command line front end of the booking service.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower::ServiceExt;
use tracing_subscriber::{fmt, EnvFilter};

use gudlft_reservation_service::{
    adapters::database::json_file::JsonFileDatabase,
    commands::{
        points_board::PointsBoardRequest, purchase_places::PurchasePlacesRequest,
        show_booking::ShowBookingRequest, show_summary::ShowSummaryRequest, DomainLogic, Error,
    },
    config::{AppConfig, LoggingConfig},
    domain::date_format,
    ports::clock::SystemClock,
};

/// Book competition places for your club
#[derive(Debug, Parser)]
#[command(name = "gudlft", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a club and the competitions, logging in with the secretary email
    Summary {
        email: String,
    },
    /// Show how many places a club can still book in a competition
    Show {
        #[arg(long)]
        club: String,
        #[arg(long)]
        competition: String,
    },
    /// Book places in a competition
    Book {
        #[arg(long)]
        club: String,
        #[arg(long)]
        competition: String,
        /// Number of places, spending one point each
        #[arg(long, allow_hyphen_values = true)]
        places: String,
    },
    /// List the points left to every club
    Board,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config).context("failed to load configuration")?;
    init_logging(&config.logging);

    let database = JsonFileDatabase::open(&config.data.clubs_file, &config.data.competitions_file)
        .await
        .context("failed to load data files")?;
    let domain = DomainLogic::new(Arc::new(database), Arc::new(SystemClock));

    match run(domain, cli.command).await {
        Ok(()) => Ok(()),
        // Business rule failures are shown to the user, not reported as crashes
        Err(err @ Error::Rejected(_)) | Err(err @ Error::InvalidRequest(_)) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err) if err.is_not_found() => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => Err(err.into()),
    }
}

async fn run(
    domain: DomainLogic<JsonFileDatabase, SystemClock>,
    command: Commands,
) -> Result<(), Error> {
    match command {
        Commands::Summary { email } => {
            let summary = domain.oneshot(ShowSummaryRequest { email }).await?;
            println!("Welcome, {}", summary.club.email);
            println!("Points available: {}", summary.club.points);
            for competition in summary.competitions {
                println!(
                    "{} | {} | places: {}",
                    competition.name,
                    competition.date.format(date_format::FORMAT),
                    competition.number_of_places
                );
            }
        }
        Commands::Show { club, competition } => {
            let form = domain
                .oneshot(ShowBookingRequest { club, competition })
                .await?;
            println!(
                "{} | places available: {} | {} can book up to {} places",
                form.competition.name,
                form.competition.number_of_places,
                form.club.name,
                form.max_places
            );
        }
        Commands::Book {
            club,
            competition,
            places,
        } => {
            let booking = domain
                .oneshot(PurchasePlacesRequest {
                    club,
                    competition,
                    places,
                })
                .await?;
            println!("Great-booking complete!");
            println!(
                "{} booked {} places in {} ({}), {} points left",
                booking.club.name,
                booking.places,
                booking.competition.name,
                booking.booking_id,
                booking.club.points
            );
        }
        Commands::Board => {
            for club in domain.oneshot(PointsBoardRequest).await? {
                println!("{:<24} {:>4}", club.name, club.points);
            }
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
