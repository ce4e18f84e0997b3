use std::collections::HashMap;
use std::fmt;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::{Duration, StationIdx};

/// Identity of a vertex: a station name served by one line.
///
/// Two keys with the same name and different lines are different vertices.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationKey {
    pub name: String,
    pub line: String,
}

impl StationKey {
    pub fn new(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: line.into(),
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.line)
    }
}

/// Directed connection owned by its source station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub to: StationIdx,
    pub duration: Duration,
}

#[derive(Clone, Debug)]
pub struct Station {
    key: StationKey,
    edges: Vec<Edge>,
}

impl Station {
    pub fn key(&self) -> &StationKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn line(&self) -> &str {
        &self.key.line
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Name match only, used to find the origin and destination lines of a
    /// query. Identity comparisons go through [`StationKey`] instead.
    pub fn is_named(&self, name: &str) -> bool {
        self.key.name == name
    }
}

/// The rail network: every station-on-a-line with its outgoing edges.
///
/// Stations keep their insertion order, so repeated queries visit them in the
/// same order and produce the same labeling.
#[derive(Clone, Debug, Default)]
pub struct RailNetwork {
    stations: Vec<Station>,
    key_to_idx: HashMap<StationKey, StationIdx>,
}

impl RailNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_station(
        &mut self,
        name: impl Into<String>,
        line: impl Into<String>,
    ) -> Result<StationIdx> {
        let key = StationKey::new(name, line);

        if self.key_to_idx.contains_key(&key) {
            return Err(Error::DuplicateStation {
                name: key.name,
                line: key.line,
            });
        }

        let idx = self.stations.len() as StationIdx;
        self.key_to_idx.insert(key.clone(), idx);
        self.stations.push(Station {
            key,
            edges: Vec::new(),
        });

        Ok(idx)
    }

    /// Adds a directed edge. Durations come in signed so that loaders can pass
    /// raw input through and get negative values rejected here.
    pub fn connect(&mut self, from: StationIdx, to: StationIdx, duration: i64) -> Result<()> {
        self.check_idx(from)?;
        self.check_idx(to)?;

        if duration < 0 {
            return Err(Error::NegativeDuration { from, to, duration });
        }
        let duration =
            Duration::try_from(duration).map_err(|_| Error::DurationOverflow { duration })?;

        self.stations[from as usize].edges.push(Edge { to, duration });
        Ok(())
    }

    pub fn connect_keys(&mut self, from: &StationKey, to: &StationKey, duration: i64) -> Result<()> {
        let from = self.require(from)?;
        let to = self.require(to)?;
        self.connect(from, to, duration)
    }

    pub fn lookup(&self, name: &str, line: &str) -> Option<StationIdx> {
        // HashMap<StationKey, _> has no lookup by borrowed parts, so scan
        // the lines of that name instead.
        self.stations_named(name)
            .into_iter()
            .find(|&idx| self.stations[idx as usize].line() == line)
    }

    pub fn lookup_key(&self, key: &StationKey) -> Option<StationIdx> {
        self.key_to_idx.get(key).copied()
    }

    /// Every vertex of the station `name`, one per line, in insertion order.
    pub fn stations_named(&self, name: &str) -> SmallVec<[StationIdx; 4]> {
        self.stations
            .iter()
            .enumerate()
            .filter(|(_, station)| station.is_named(name))
            .map(|(idx, _)| idx as StationIdx)
            .collect()
    }

    pub fn station(&self, idx: StationIdx) -> Option<&Station> {
        self.stations.get(idx as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StationIdx, &Station)> {
        self.stations
            .iter()
            .enumerate()
            .map(|(idx, station)| (idx as StationIdx, station))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.stations.iter().map(|s| s.edges.len()).sum()
    }

    pub(crate) fn edges_from(&self, idx: StationIdx) -> &[Edge] {
        &self.stations[idx as usize].edges
    }

    fn require(&self, key: &StationKey) -> Result<StationIdx> {
        self.lookup_key(key).ok_or_else(|| Error::UnknownStation {
            name: key.name.clone(),
            line: key.line.clone(),
        })
    }

    fn check_idx(&self, idx: StationIdx) -> Result<()> {
        if (idx as usize) < self.stations.len() {
            Ok(())
        } else {
            Err(Error::InvalidStationIndex(idx))
        }
    }
}
