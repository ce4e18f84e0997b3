//! Serde model of a network file.
//!
//! ```json
//! {
//!   "stations": [
//!     { "name": "A", "line": "Line1",
//!       "edges": [{ "name": "B", "line": "Line1", "duration": 5 }] },
//!     { "name": "B", "line": "Line1", "edges": [] }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::network::{RailNetwork, StationKey};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub stations: Vec<StationRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub line: String,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Outgoing edge, naming the destination by station name and line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub name: String,
    pub line: String,
    pub duration: i64,
}

impl NetworkDescription {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Builds the network in two passes: every station first, so edges may
    /// point forward in the file.
    pub fn into_network(self) -> Result<RailNetwork> {
        let mut network = RailNetwork::new();

        for record in &self.stations {
            network.add_station(record.name.as_str(), record.line.as_str())?;
        }

        for record in &self.stations {
            let from = StationKey::new(record.name.as_str(), record.line.as_str());
            for edge in &record.edges {
                let to = StationKey::new(edge.name.as_str(), edge.line.as_str());
                network.connect_keys(&from, &to, edge.duration)?;
            }
        }

        debug!(
            stations = network.len(),
            edges = network.edge_count(),
            "loaded network description"
        );
        Ok(network)
    }
}

impl RailNetwork {
    pub fn from_description(description: NetworkDescription) -> Result<Self> {
        description.into_network()
    }
}
