//! Usage: railroute <network> <source> <destination> [--format json|gtfs]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gtfs_structures::Gtfs;
use humantime::format_duration;
use railroute::{GtfsImport, NetworkDescription, RailNetwork, SearchOptions};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Fastest route between two stations of a rail network
#[derive(Parser)]
#[command(name = "railroute", version, about)]
struct Cli {
    /// Network file: a JSON description, or a GTFS zip/directory with --format gtfs
    network: PathBuf,

    /// Station to start from
    source: String,

    /// Station to travel to
    destination: String,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Skip a station's remaining edges once the destination is improved.
    /// Faster, but the reported route and total may not be the fastest
    #[arg(long)]
    prune: bool,

    /// Warn when the route needs more line changes than this
    #[arg(long)]
    max_changes: Option<usize>,

    /// Minutes to change lines within a station (GTFS only)
    #[arg(long)]
    transfer_minutes: Option<u32>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Gtfs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let network = load(&cli)?;
    let options = SearchOptions {
        prune_at_destination: cli.prune,
        max_changes: cli.max_changes,
    };

    let Some(itinerary) = network.route(&cli.source, &cli.destination, &options)? else {
        println!("No route found from {} to {}.", cli.source, cli.destination);
        return Ok(());
    };

    println!("{}", itinerary.display(&network));
    println!(
        "The trip takes about {}.",
        format_duration(Duration::from_secs(itinerary.total().saturating_mul(60)))
    );

    if itinerary.exceeds_changes(options.max_changes) {
        warn!(
            changes = itinerary.changes(),
            max_changes = ?options.max_changes,
            "route needs more line changes than allowed"
        );
    }

    Ok(())
}

fn load(cli: &Cli) -> anyhow::Result<RailNetwork> {
    let path = &cli.network;

    let network = match cli.format {
        Format::Json => {
            NetworkDescription::from_path(path)
                .with_context(|| format!("reading {}", path.display()))?
                .into_network()?
        }
        Format::Gtfs => {
            let path = path.to_str().context("GTFS path is not valid UTF-8")?;
            let gtfs = Gtfs::new(path).map_err(railroute::Error::from)?;
            let import = GtfsImport {
                transfer_minutes: cli.transfer_minutes,
            };
            RailNetwork::from_gtfs(&gtfs, &import)?
        }
    };

    Ok(network)
}
