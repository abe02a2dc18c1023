use super::FeedId;
use geo::Point;
use serde::{Deserialize, Serialize};

/// global stop index assigned by the [`super::TimetableBuilder`]. stops from
/// all feeds share one dense id space so that per-query scan state can be
/// held in flat arrays indexed by stop id.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopId(pub usize);

impl std::fmt::Display for StopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stop {}", self.0)
    }
}

/// an addressable transit location. immutable after ingestion.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Stop {
    pub id: StopId,
    pub feed: FeedId,
    /// lon/lat location, used for access resolving and transfer precompute.
    pub location: Point<f64>,
}
