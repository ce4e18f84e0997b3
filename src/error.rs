use thiserror::Error;

use crate::StationIdx;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a network or running a query against it.
///
/// Unknown station names and unreachable destinations are not errors: a
/// query for them comes back with an empty path.
#[derive(Debug, Error)]
pub enum Error {
    /// `extract_min` was called on an empty heap. The search never does this,
    /// so seeing it means an internal invariant broke.
    #[error("extract_min called on an empty heap")]
    EmptyHeap,

    #[error("station {name:?} on line {line:?} is defined more than once")]
    DuplicateStation { name: String, line: String },

    #[error("station {name:?} on line {line:?} does not exist")]
    UnknownStation { name: String, line: String },

    #[error("station index {0} is out of range")]
    InvalidStationIndex(StationIdx),

    #[error("edge {from} -> {to} has negative duration {duration}")]
    NegativeDuration {
        from: StationIdx,
        to: StationIdx,
        duration: i64,
    },

    #[error("edge duration {duration} does not fit in 32 bits")]
    DurationOverflow { duration: i64 },

    /// The predecessor chain loops back on itself.
    #[error("predecessor chain revisits station {station}")]
    PredecessorCycle { station: StationIdx },

    #[error("invalid network description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read GTFS feed: {0}")]
    Gtfs(#[from] gtfs_structures::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
