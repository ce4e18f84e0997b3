//! Two lines leave the origin and meet again downstream.
//!
//! ```text
//!   S/North ──── 10 ────► M/North ──0──► M/East ── 4 ──► T/East
//!                                          ▲
//!   S/South ── 3 ──► M/South ───── 0 ──────┘
//! ```
//!
//! North is searched first and labels M/East at 10. The South search then
//! reaches M/East at 3 and overwrites it, so the trip to T costs 7 via South.

use railroute::{RailNetwork, SearchOptions, StationKey};

fn build() -> railroute::Result<RailNetwork> {
    let mut network = RailNetwork::new();

    for (name, line) in [
        ("S", "North"),
        ("S", "South"),
        ("M", "North"),
        ("M", "South"),
        ("M", "East"),
        ("T", "East"),
    ] {
        network.add_station(name, line)?;
    }

    let edges = [
        (("S", "North"), ("M", "North"), 10),
        (("S", "South"), ("M", "South"), 3),
        (("M", "North"), ("M", "East"), 0),
        (("M", "South"), ("M", "East"), 0),
        (("M", "East"), ("T", "East"), 4),
    ];
    for ((from_name, from_line), (to_name, to_line), duration) in edges {
        network.connect_keys(
            &StationKey::new(from_name, from_line),
            &StationKey::new(to_name, to_line),
            duration,
        )?;
    }

    Ok(network)
}

fn main() -> anyhow::Result<()> {
    let network = build()?;

    let itinerary = network
        .route("S", "T", &SearchOptions::default())?
        .ok_or_else(|| anyhow::anyhow!("no route from S to T"))?;

    println!("{}", itinerary.render(&network));

    Ok(())
}
