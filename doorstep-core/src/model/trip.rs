use super::FeedId;
use serde::{Deserialize, Serialize};

/// global trip index assigned by the [`super::TimetableBuilder`], dense
/// across feeds for the same reason as [`super::StopId`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripId(pub usize);

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trip {}", self.0)
    }
}

/// a single vehicle run. the engine only ever uses this as a correlation
/// key: boarding a connection of an already-boarded trip costs nothing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Trip {
    pub id: TripId,
    pub feed: FeedId,
}
