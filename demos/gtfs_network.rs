// Usage: cargo run --example gtfs-network <path_to_zip> <source_name> <destination_name>

use gtfs_structures::Gtfs;
use humantime::format_duration;
use railroute::{GtfsImport, RailNetwork, SearchOptions};
use std::{env, time::Duration};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "Usage: {} <path_to_zip> <source_name> <destination_name>",
            args[0]
        );
        std::process::exit(1);
    }

    let path = &args[1];
    let source = &args[2];
    let destination = &args[3];

    // Load GTFS, changing lines inside a station costs three minutes
    let gtfs = Gtfs::new(path)?;
    let import = GtfsImport {
        transfer_minutes: Some(3),
    };
    let network = RailNetwork::from_gtfs(&gtfs, &import)?;

    println!(
        "{} station-lines, {} edges",
        network.len(),
        network.edge_count()
    );

    let Some(itinerary) = network.route(source, destination, &SearchOptions::default())? else {
        println!("No route found.");
        return Ok(());
    };

    println!(
        "Fastest route ({}):",
        format_duration(Duration::from_secs(itinerary.total() * 60))
    );
    for segment in itinerary.segments() {
        let names: Vec<_> = segment
            .stations
            .iter()
            .filter_map(|&idx| network.station(idx))
            .map(|station| station.name())
            .collect();
        println!("  [{}] {}", segment.line, names.join(" -> "));
    }

    Ok(())
}
