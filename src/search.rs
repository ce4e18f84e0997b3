use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::heap::IndirectMinHeap;
use crate::network::RailNetwork;
use crate::{Cost, StationIdx, UNREACHABLE};

/// Knobs for a single query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    /// Stop scanning a station's remaining edges once one of them improves a
    /// destination-named station. Saves work on dense networks, but the
    /// skipped edges are never revisited from that station. Any station,
    /// the destination included, can end up with a cost above optimal or
    /// unreached, so the returned route may not be the fastest one.
    pub prune_at_destination: bool,
    /// Upper bound on line changes the caller is willing to accept. The
    /// search itself ignores it; see [`crate::Itinerary::exceeds_changes`].
    pub max_changes: Option<usize>,
}

/// Per-query cost and predecessor table, indexed by [`StationIdx`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    cost: Vec<Cost>,
    predecessor: Vec<Option<StationIdx>>,
}

impl Labels {
    pub fn new(stations: usize) -> Self {
        Self {
            cost: vec![UNREACHABLE; stations],
            predecessor: vec![None; stations],
        }
    }

    pub fn reset(&mut self, stations: usize) {
        self.cost.clear();
        self.cost.resize(stations, UNREACHABLE);
        self.predecessor.clear();
        self.predecessor.resize(stations, None);
    }

    pub fn len(&self) -> usize {
        self.cost.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cost.is_empty()
    }

    /// Best known cost, or `None` while the station is unreached.
    pub fn cost(&self, station: StationIdx) -> Option<Cost> {
        self.cost
            .get(station as usize)
            .copied()
            .filter(|&cost| cost != UNREACHABLE)
    }

    pub fn is_reachable(&self, station: StationIdx) -> bool {
        self.cost(station).is_some()
    }

    pub fn predecessor(&self, station: StationIdx) -> Option<StationIdx> {
        self.predecessor.get(station as usize).copied().flatten()
    }

    pub(crate) fn raw_cost(&self, station: StationIdx) -> Cost {
        self.cost[station as usize]
    }
}

/// Labels every station reachable from any line of `source` with its cheapest
/// cost and a predecessor.
///
/// Each line of the source station is searched in turn until its heap runs
/// dry. Labels carry over between those searches, so a later line only
/// overwrites a station when it reaches it more cheaply. Source-named
/// stations are never relabeled, which keeps paths from wandering back
/// through another line of the origin.
pub fn shortest_paths(
    network: &RailNetwork,
    source: &str,
    destination: &str,
    options: &SearchOptions,
) -> Result<Labels> {
    let mut labels = Labels::new(network.len());
    label_into(network, source, destination, options, &mut labels)?;
    Ok(labels)
}

/// Same as [`shortest_paths`] but writes into an existing table, which is
/// reset first.
#[tracing::instrument(level = "debug", skip(network, options, labels))]
pub fn label_into(
    network: &RailNetwork,
    source: &str,
    destination: &str,
    options: &SearchOptions,
    labels: &mut Labels,
) -> Result<()> {
    labels.reset(network.len());

    if network.stations_named(destination).is_empty() {
        warn!(destination, "unknown destination station, no route can be found");
    }

    let roots = network.stations_named(source);
    if roots.is_empty() {
        warn!(source, "unknown source station, nothing to search");
        return Ok(());
    }
    debug!(roots = roots.len(), "searching from each line of the source");

    let mut heap = IndirectMinHeap::with_capacity(network.len());
    let mut pops = 0usize;
    let mut relaxations = 0usize;

    for &root in &roots {
        heap.clear();
        labels.cost[root as usize] = 0;
        heap.insert(root, |s: StationIdx| labels.cost[s as usize]);

        while !heap.is_empty() {
            let current = heap.extract_min(|s: StationIdx| labels.cost[s as usize])?;
            let current_cost = labels.cost[current as usize];
            pops += 1;

            for edge in network.edges_from(current) {
                let next = edge.to;
                let candidate = current_cost.saturating_add(Cost::from(edge.duration));

                let Some(station) = network.station(next) else {
                    continue;
                };

                if candidate < labels.cost[next as usize] && !station.is_named(source) {
                    trace!(from = current, to = next, cost = candidate, "relaxed");
                    labels.cost[next as usize] = candidate;
                    labels.predecessor[next as usize] = Some(current);
                    heap.insert(next, |s: StationIdx| labels.cost[s as usize]);
                    relaxations += 1;

                    if options.prune_at_destination && station.is_named(destination) {
                        break;
                    }
                }
            }
        }
    }

    debug!(pops, relaxations, "search finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn warnings_for(source: &str, destination: &str) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let network = line_change();
        tracing::subscriber::with_default(subscriber, || {
            shortest_paths(&network, source, destination, &SearchOptions::default()).unwrap();
        });

        captured.contents()
    }

    fn line_change() -> RailNetwork {
        let mut network = RailNetwork::new();
        let a = network.add_station("A", "Line1").unwrap();
        let b1 = network.add_station("B", "Line1").unwrap();
        let b2 = network.add_station("B", "Line2").unwrap();
        let c = network.add_station("C", "Line2").unwrap();
        network.connect(a, b1, 5).unwrap();
        network.connect(b1, b2, 0).unwrap();
        network.connect(b2, c, 3).unwrap();
        network
    }

    #[test]
    fn labels_every_reachable_station() {
        let network = line_change();
        let labels = shortest_paths(&network, "A", "C", &SearchOptions::default()).unwrap();

        let costs: Vec<_> = (0..4).map(|s| labels.cost(s)).collect();
        assert_eq!(costs, vec![Some(0), Some(5), Some(5), Some(8)]);
        assert_eq!(labels.predecessor(0), None);
        assert_eq!(labels.predecessor(3), Some(2));
    }

    #[test]
    fn unknown_source_leaves_everything_unreached() {
        let network = line_change();
        let labels = shortest_paths(&network, "Nowhere", "C", &SearchOptions::default()).unwrap();

        assert!((0..4).all(|s| !labels.is_reachable(s)));
    }

    #[test]
    fn source_lines_are_never_relabeled() {
        let mut network = RailNetwork::new();
        let a1 = network.add_station("A", "L1").unwrap();
        let a2 = network.add_station("A", "L2").unwrap();
        let b = network.add_station("B", "L1").unwrap();
        network.connect(a1, b, 2).unwrap();
        network.connect(b, a2, 1).unwrap();
        network.connect(a2, a1, 0).unwrap();

        let labels = shortest_paths(&network, "A", "B", &SearchOptions::default()).unwrap();

        assert_eq!(labels.cost(a1), Some(0));
        assert_eq!(labels.cost(a2), Some(0));
        assert_eq!(labels.predecessor(a1), None);
        assert_eq!(labels.predecessor(a2), None);
    }

    #[test]
    fn reusing_labels_resets_the_previous_query() {
        let network = line_change();
        let mut labels = Labels::new(0);

        label_into(&network, "A", "C", &SearchOptions::default(), &mut labels).unwrap();
        label_into(&network, "B", "C", &SearchOptions::default(), &mut labels).unwrap();

        assert_eq!(labels.cost(0), None);
        assert_eq!(labels.cost(3), Some(3));
        assert_eq!(labels, shortest_paths(&network, "B", "C", &SearchOptions::default()).unwrap());
    }

    #[test]
    fn unknown_names_are_logged() {
        let logs = warnings_for("A", "Nowhere");
        assert!(logs.contains("unknown destination station"));
        assert!(!logs.contains("unknown source station"));

        let logs = warnings_for("Nowhere", "C");
        assert!(logs.contains("unknown source station"));
        assert!(!logs.contains("unknown destination station"));

        assert!(warnings_for("A", "C").is_empty());
    }

    #[test]
    fn pruning_can_miss_a_cheaper_route_to_the_destination() {
        // A's direct edge to D is scanned first and relaxed, so the cheaper
        // detour through X is never looked at.
        let mut network = RailNetwork::new();
        let a = network.add_station("A", "L1").unwrap();
        let d = network.add_station("D", "L1").unwrap();
        let x = network.add_station("X", "L1").unwrap();
        network.connect(a, d, 10).unwrap();
        network.connect(a, x, 1).unwrap();
        network.connect(x, d, 1).unwrap();

        let full = shortest_paths(&network, "A", "D", &SearchOptions::default()).unwrap();
        let pruned = SearchOptions {
            prune_at_destination: true,
            ..SearchOptions::default()
        };
        let quick = shortest_paths(&network, "A", "D", &pruned).unwrap();

        assert_eq!(full.cost(d), Some(2));
        assert_eq!(full.predecessor(d), Some(x));
        assert_eq!(quick.cost(d), Some(10));
        assert_eq!(quick.predecessor(d), Some(a));
        assert_eq!(quick.cost(x), None);
    }

    #[test]
    fn options_default_to_no_pruning() {
        let options: SearchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SearchOptions::default());

        let options: SearchOptions =
            serde_json::from_str(r#"{"prune_at_destination": true, "max_changes": 2}"#).unwrap();
        assert!(options.prune_at_destination);
        assert_eq!(options.max_changes, Some(2));
    }
}
