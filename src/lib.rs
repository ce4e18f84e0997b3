//! Fastest routes through rail networks where a station served by several
//! lines is one vertex per line.

pub mod description;
pub mod error;
pub mod gtfs;
pub mod heap;
pub mod itinerary;
pub mod network;
pub mod search;

use tracing::info;

pub use description::NetworkDescription;
pub use error::{Error, Result};
pub use gtfs::GtfsImport;
pub use heap::IndirectMinHeap;
pub use itinerary::{Itinerary, ItineraryDisplay, Segment, best_destination, reconstruct_path};
pub use network::{Edge, RailNetwork, Station, StationKey};
pub use search::{Labels, SearchOptions, label_into, shortest_paths};

/// Index of a station-on-a-line inside its [`RailNetwork`].
pub type StationIdx = u32;
/// Travel time of a single edge.
pub type Duration = u32;
/// Accumulated travel time along a path.
pub type Cost = u64;

/// Cost of a station no path has reached yet.
pub const UNREACHABLE: Cost = Cost::MAX;

impl RailNetwork {
    /// Runs a full query: labels the network, picks the cheapest line of
    /// `destination` and splits the path into line segments.
    ///
    /// `Ok(None)` means there is no route, including when either name is not
    /// in the network.
    pub fn route(
        &self,
        source: &str,
        destination: &str,
        options: &SearchOptions,
    ) -> Result<Option<Itinerary>> {
        let labels = shortest_paths(self, source, destination, options)?;
        let path = reconstruct_path(self, &labels, destination)?;

        let itinerary = Itinerary::from_path(self, &labels, &path);
        match &itinerary {
            Some(found) => info!(
                source,
                destination,
                total = found.total(),
                changes = found.changes(),
                "route found"
            ),
            None => info!(source, destination, "no route"),
        }

        Ok(itinerary)
    }
}
