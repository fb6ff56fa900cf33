use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tourmap_core::Environment;
use tracing_subscriber::EnvFilter;

mod annotate;
mod destinations;
mod details;

#[derive(Debug, Parser)]
#[command(name = "tourmap-cli")]
#[command(about = "Annotate a map with place markers and inspect place details")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Place markers on a headless map, fit the viewport and show the panel
    Annotate {
        /// YAML or JSON file with a top-level `markers` list
        #[arg(long, conflicts_with = "destination", required_unless_present = "destination")]
        markers: Option<PathBuf>,
        /// Listing API destination whose locations become markers
        #[arg(long)]
        destination: Option<i64>,
        /// Marker index to click after loading; repeat to click several in turn
        #[arg(long = "select", value_name = "INDEX")]
        selections: Vec<usize>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up one place and print its detail panel
    Details {
        place_id: String,
        /// Print photo URLs of this width instead of photo references
        #[arg(long, value_name = "PX")]
        photo_width: Option<u32>,
        /// Print the raw place details as JSON
        #[arg(long)]
        json: bool,
    },
    /// List one page of listing API destinations
    Destinations {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Production logs are plain text.
fn use_ansi(env: &Environment) -> bool {
    *env != Environment::Production
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = tourmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi(&config.env))
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Annotate {
            markers,
            destination,
            selections,
            json,
        } => {
            let source = match (markers, destination) {
                (Some(path), _) => annotate::MarkerSource::File(path),
                (None, Some(id)) => annotate::MarkerSource::Destination(id),
                (None, None) => anyhow::bail!("either --markers or --destination is required"),
            };
            annotate::run_annotate(&config, source, &selections, json).await?;
        }
        Commands::Details {
            place_id,
            photo_width,
            json,
        } => details::run_details(&config, &place_id, photo_width, json).await?,
        Commands::Destinations { page, json } => {
            destinations::run_destinations(&config, page, json).await?;
        }
    }

    Ok(())
}
