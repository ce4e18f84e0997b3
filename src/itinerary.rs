use std::fmt;

use crate::error::{Error, Result};
use crate::heap::IndirectMinHeap;
use crate::network::RailNetwork;
use crate::search::Labels;
use crate::{Cost, StationIdx};

/// The cheapest reached line of `destination`, if any.
///
/// Candidates go through the same indirect heap the search uses, so equal
/// costs resolve the way the heap happens to order them.
pub fn best_destination(
    network: &RailNetwork,
    labels: &Labels,
    destination: &str,
) -> Result<Option<StationIdx>> {
    let mut candidates = IndirectMinHeap::new();

    for station in network.stations_named(destination) {
        if labels.is_reachable(station) {
            candidates.insert(station, |s: StationIdx| labels.raw_cost(s));
        }
    }

    if candidates.is_empty() {
        return Ok(None);
    }
    candidates
        .extract_min(|s: StationIdx| labels.raw_cost(s))
        .map(Some)
}

/// Walks predecessors back from the best destination line and returns the
/// stations in travel order. Empty when the destination is unknown or
/// unreached.
pub fn reconstruct_path(
    network: &RailNetwork,
    labels: &Labels,
    destination: &str,
) -> Result<Vec<StationIdx>> {
    let Some(end) = best_destination(network, labels, destination)? else {
        return Ok(Vec::new());
    };

    let mut path = vec![end];
    let mut current = end;

    while let Some(previous) = labels.predecessor(current) {
        // A simple path never holds more stations than the network does.
        if path.len() >= network.len() {
            return Err(Error::PredecessorCycle { station: previous });
        }
        path.push(previous);
        current = previous;
    }

    path.reverse();
    Ok(path)
}

/// A maximal run of consecutive path stations on one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub line: String,
    pub stations: Vec<StationIdx>,
}

/// A route split into line segments, with its total cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Itinerary {
    segments: Vec<Segment>,
    total: Cost,
}

impl Itinerary {
    /// Groups `path` into segments. Returns `None` for an empty path.
    pub fn from_path(network: &RailNetwork, labels: &Labels, path: &[StationIdx]) -> Option<Self> {
        let &end = path.last()?;
        let total = labels.cost(end)?;

        let mut segments: Vec<Segment> = Vec::new();
        for &idx in path {
            let line = network.station(idx)?.line();

            match segments.last_mut() {
                Some(segment) if segment.line == line => segment.stations.push(idx),
                _ => segments.push(Segment {
                    line: line.to_owned(),
                    stations: vec![idx],
                }),
            }
        }

        Some(Self { segments, total })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every station of the route, in order.
    pub fn path(&self) -> Vec<StationIdx> {
        self.segments
            .iter()
            .flat_map(|segment| segment.stations.iter().copied())
            .collect()
    }

    pub fn total(&self) -> Cost {
        self.total
    }

    /// Number of line changes along the route.
    pub fn changes(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub fn exceeds_changes(&self, max_changes: Option<usize>) -> bool {
        max_changes.is_some_and(|max| self.changes() > max)
    }

    /// One-sentence description, e.g.
    /// `From A, take line Line1 to B; then change to line Line2, and continue to C. Total cost 8.`
    pub fn render(&self, network: &RailNetwork) -> String {
        self.display(network).to_string()
    }

    /// [`fmt::Display`] adapter for [`Itinerary::render`].
    pub fn display<'a>(&'a self, network: &'a RailNetwork) -> ItineraryDisplay<'a> {
        ItineraryDisplay {
            itinerary: self,
            network,
        }
    }
}

pub struct ItineraryDisplay<'a> {
    itinerary: &'a Itinerary,
    network: &'a RailNetwork,
}

impl fmt::Display for ItineraryDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |idx: StationIdx| self.network.station(idx).map_or("?", |s| s.name());
        let segments = &self.itinerary.segments;

        for (i, segment) in segments.iter().enumerate() {
            if i == 0 {
                write!(f, "From {}, take line {} to ", name(segment.stations[0]), segment.line)?;
            } else {
                let changed_at = *segments[i - 1].stations.last().unwrap_or(&segment.stations[0]);
                write!(
                    f,
                    "{}; then change to line {}, and continue to ",
                    name(changed_at),
                    segment.line
                )?;
            }
        }

        let arrival = segments
            .last()
            .and_then(|segment| segment.stations.last().copied());
        if let Some(arrival) = arrival {
            write!(f, "{}. Total cost {}.", name(arrival), self.itinerary.total)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchOptions, shortest_paths};

    fn three_lines() -> RailNetwork {
        let mut network = RailNetwork::new();
        let a = network.add_station("A", "Red").unwrap();
        let b_red = network.add_station("B", "Red").unwrap();
        let b_blue = network.add_station("B", "Blue").unwrap();
        let c = network.add_station("C", "Blue").unwrap();
        let c_green = network.add_station("C", "Green").unwrap();
        let d = network.add_station("D", "Green").unwrap();
        network.connect(a, b_red, 2).unwrap();
        network.connect(b_red, b_blue, 1).unwrap();
        network.connect(b_blue, c, 2).unwrap();
        network.connect(c, c_green, 1).unwrap();
        network.connect(c_green, d, 4).unwrap();
        network
    }

    #[test]
    fn renders_each_line_change() {
        let network = three_lines();
        let labels = shortest_paths(&network, "A", "D", &SearchOptions::default()).unwrap();
        let path = reconstruct_path(&network, &labels, "D").unwrap();
        let itinerary = Itinerary::from_path(&network, &labels, &path).unwrap();

        assert_eq!(itinerary.changes(), 2);
        assert_eq!(
            itinerary.render(&network),
            "From A, take line Red to B; then change to line Blue, and continue to C; \
             then change to line Green, and continue to D. Total cost 10."
        );
    }

    #[test]
    fn single_line_trip() {
        let network = three_lines();
        let labels = shortest_paths(&network, "A", "B", &SearchOptions::default()).unwrap();
        let path = reconstruct_path(&network, &labels, "B").unwrap();
        let itinerary = Itinerary::from_path(&network, &labels, &path).unwrap();

        assert_eq!(path, vec![0, 1]);
        assert_eq!(itinerary.render(&network), "From A, take line Red to B. Total cost 2.");
        assert_eq!(
            format!("{}", itinerary.display(&network)),
            itinerary.render(&network)
        );
        assert!(!itinerary.exceeds_changes(Some(0)));
    }

    #[test]
    fn change_limit_is_reported() {
        let network = three_lines();
        let labels = shortest_paths(&network, "A", "D", &SearchOptions::default()).unwrap();
        let path = reconstruct_path(&network, &labels, "D").unwrap();
        let itinerary = Itinerary::from_path(&network, &labels, &path).unwrap();

        assert!(itinerary.exceeds_changes(Some(1)));
        assert!(!itinerary.exceeds_changes(Some(2)));
        assert!(!itinerary.exceeds_changes(None));
    }

    #[test]
    fn cheapest_destination_line_wins() {
        let mut network = RailNetwork::new();
        let s = network.add_station("S", "L1").unwrap();
        let d1 = network.add_station("D", "L1").unwrap();
        let s2 = network.add_station("S", "L2").unwrap();
        let d2 = network.add_station("D", "L2").unwrap();
        network.connect(s, d1, 9).unwrap();
        network.connect(s2, d2, 4).unwrap();

        let labels = shortest_paths(&network, "S", "D", &SearchOptions::default()).unwrap();

        assert_eq!(best_destination(&network, &labels, "D").unwrap(), Some(d2));
        assert_eq!(reconstruct_path(&network, &labels, "D").unwrap(), vec![s2, d2]);
    }

    #[test]
    fn unreached_destination_gives_empty_path() {
        let mut network = three_lines();
        network.add_station("E", "Orange").unwrap();
        let labels = shortest_paths(&network, "A", "E", &SearchOptions::default()).unwrap();

        assert_eq!(best_destination(&network, &labels, "E").unwrap(), None);
        assert!(reconstruct_path(&network, &labels, "E").unwrap().is_empty());
        assert_eq!(Itinerary::from_path(&network, &labels, &[]), None);
    }
}
