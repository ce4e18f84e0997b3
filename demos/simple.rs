use railroute::{RailNetwork, SearchOptions};

// a single line with stations [S0..S9], two minutes apart
fn single_line() -> railroute::Result<RailNetwork> {
    let mut network = RailNetwork::new();

    let stations = (0..10)
        .map(|i| network.add_station(format!("S{i}"), "L0"))
        .collect::<Result<Vec<_>, _>>()?;

    for pair in stations.windows(2) {
        network.connect(pair[0], pair[1], 2)?;
    }

    Ok(network)
}

fn main() -> anyhow::Result<()> {
    let network = single_line()?;

    match network.route("S0", "S9", &SearchOptions::default())? {
        Some(itinerary) => println!("{}", itinerary.render(&network)),
        None => println!("No route found."),
    }

    Ok(())
}
