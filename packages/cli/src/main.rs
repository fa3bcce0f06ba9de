#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for isochrone resolution.
//!
//! Resolves a saved provider response from a file or stdin, generates mock
//! isochrones, or starts the HTTP server. Results are printed to stdout as
//! `GeoJSON`; logs go to stderr via `pretty_env_logger`.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use sitescout_isochrone::{IsochroneConfig, mock_isochrone, resolve};
use sitescout_isochrone_models::IsochroneQuery;

#[derive(Parser)]
#[command(name = "sitescout_cli", about = "Isochrone resolution tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a saved provider response into a single polygon feature
    Resolve {
        /// Path to the provider response JSON, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
        #[command(flatten)]
        query: QueryArgs,
        /// Config file overriding the embedded defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Generate a circular mock isochrone
    Mock {
        #[command(flatten)]
        query: QueryArgs,
        /// Config file overriding the embedded defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Start the HTTP server (`BIND_ADDR`, `PORT`, `ISOCHRONE_CONFIG`)
    Serve,
}

#[derive(Args)]
struct QueryArgs {
    /// Latitude of the requested point
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude of the requested point
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
    /// Drive time in minutes
    #[arg(long)]
    minutes: u32,
}

impl QueryArgs {
    const fn to_query(&self) -> IsochroneQuery {
        IsochroneQuery::new(self.lat, self.lng, self.minutes)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            input,
            query,
            config,
            compact,
        } => {
            let config = IsochroneConfig::load(config.as_deref())?;
            let payload = read_payload(&input)?;
            let resolution = resolve(&payload, &query.to_query(), &config)?;

            for warning in &resolution.warnings {
                log::warn!("{warning}");
            }

            print_json(&resolution.to_json()?, compact)?;
        }
        Commands::Mock {
            query,
            config,
            compact,
        } => {
            let config = IsochroneConfig::load(config.as_deref())?;
            let resolution = mock_isochrone(&query.to_query(), &config)?;
            print_json(&resolution.to_json()?, compact)?;
        }
        Commands::Serve => {
            let config = IsochroneConfig::from_env()?;
            actix_web::rt::System::new().block_on(sitescout_server::run_server(config))?;
        }
    }

    Ok(())
}

/// Reads and parses the provider payload from `input` (`-` is stdin).
fn read_payload(input: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = if input == "-" {
        log::info!("Reading provider response from stdin");
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        log::info!("Reading provider response from {input}");
        std::fs::read_to_string(Path::new(input))?
    };

    Ok(serde_json::from_str(&contents)?)
}

fn print_json(value: &Value, compact: bool) -> Result<(), serde_json::Error> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{out}");
    Ok(())
}
