use std::collections::{BTreeMap, HashMap};

use gtfs_structures::{Gtfs, Stop};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::network::{RailNetwork, StationKey};
use crate::{Duration, StationIdx};

/// How a GTFS feed is turned into a [`RailNetwork`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GtfsImport {
    /// When set, every pair of lines serving the same station is joined both
    /// ways by an edge of this many minutes.
    pub transfer_minutes: Option<u32>,
}

/// One trip reduced to what the network needs: its line and timed calls.
struct TripCalls {
    line: String,
    calls: Vec<Call>,
}

struct Call {
    station: String,
    arrival: Option<u32>,
    departure: Option<u32>,
}

impl RailNetwork {
    /// Builds one station per (stop name, route) pair. Consecutive calls of a
    /// trip become an edge weighted by the fastest observed hop, in whole
    /// minutes rounded up.
    pub fn from_gtfs(gtfs: &Gtfs, import: &GtfsImport) -> Result<Self> {
        // Phase 1: route id -> line label
        let lines = build_line_names(gtfs);

        // Phase 2: flatten trips, in trip id order so station order is stable
        let mut trip_ids: Vec<&String> = gtfs.trips.keys().collect();
        trip_ids.sort();

        let trips = trip_ids.into_iter().filter_map(|trip_id| {
            let trip = &gtfs.trips[trip_id];
            if trip.stop_times.is_empty() {
                return None;
            }

            let mut sorted_stop_times: Vec<_> = trip.stop_times.iter().collect();
            sorted_stop_times.sort_by_key(|st| st.stop_sequence);

            let calls = sorted_stop_times
                .iter()
                .map(|st| Call {
                    station: station_name(gtfs, &st.stop),
                    arrival: st.arrival_time,
                    departure: st.departure_time,
                })
                .collect();

            let line = lines
                .get(trip.route_id.as_str())
                .cloned()
                .unwrap_or_else(|| trip.route_id.clone());

            Some(TripCalls { line, calls })
        });

        build_network(trips, import)
    }
}

fn build_line_names(gtfs: &Gtfs) -> HashMap<&str, String> {
    gtfs.routes
        .iter()
        .map(|(route_id, route)| {
            let name = route
                .short_name
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(route.long_name.as_deref())
                .unwrap_or(route_id.as_str());
            (route_id.as_str(), name.to_owned())
        })
        .collect()
}

/// Platforms share their parent station's name so that lines calling at
/// different platforms still count as the same station.
fn station_name(gtfs: &Gtfs, stop: &Stop) -> String {
    let parent = stop
        .parent_station
        .as_ref()
        .and_then(|parent_id| gtfs.stops.get(parent_id));

    parent
        .map(|parent| &**parent)
        .unwrap_or(stop)
        .name
        .clone()
        .unwrap_or_else(|| stop.id.clone())
}

fn build_network(
    trips: impl IntoIterator<Item = TripCalls>,
    import: &GtfsImport,
) -> Result<RailNetwork> {
    let mut network = RailNetwork::new();
    let mut hops: BTreeMap<(StationIdx, StationIdx), Duration> = BTreeMap::new();

    // Phase 3: stations in order of first appearance, fastest hop per pair
    for trip in trips {
        let mut previous: Option<(StationIdx, &Call)> = None;

        for call in &trip.calls {
            let key = StationKey::new(call.station.as_str(), trip.line.as_str());
            let idx = match network.lookup_key(&key) {
                Some(idx) => idx,
                None => network.add_station(key.name, key.line)?,
            };

            if let Some((from, from_call)) = previous {
                let leaves = from_call.departure.or(from_call.arrival);
                let arrives = call.arrival.or(call.departure);

                if let (Some(leaves), Some(arrives)) = (leaves, arrives)
                    && from != idx
                {
                    let minutes = arrives.saturating_sub(leaves).div_ceil(60);
                    hops.entry((from, idx))
                        .and_modify(|best| *best = (*best).min(minutes))
                        .or_insert(minutes);
                }
            }

            previous = Some((idx, call));
        }
    }

    for (&(from, to), &minutes) in &hops {
        network.connect(from, to, i64::from(minutes))?;
    }

    // Phase 4: same-station transfers between lines
    if let Some(minutes) = import.transfer_minutes {
        let mut by_name: BTreeMap<String, Vec<StationIdx>> = BTreeMap::new();
        for (idx, station) in network.iter() {
            by_name.entry(station.name().to_owned()).or_default().push(idx);
        }

        for lines in by_name.values() {
            for &from in lines {
                for &to in lines {
                    if from != to {
                        network.connect(from, to, i64::from(minutes))?;
                    }
                }
            }
        }
    }

    debug!(
        stations = network.len(),
        edges = network.edge_count(),
        "built network from GTFS"
    );
    Ok(network)
}
