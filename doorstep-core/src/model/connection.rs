use super::{FeedId, StopId, Time, TripId};
use serde::{Deserialize, Serialize};

/// one scheduled vehicle movement between two stops on one trip. immutable
/// value record; the timetable owns the sorted sequence of these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub feed: FeedId,
    pub departure_stop: StopId,
    /// departure time at `departure_stop`.
    pub departure_time: Time,
    pub arrival_stop: StopId,
    /// arrival time at `arrival_stop`. always strictly after departure.
    pub arrival_time: Time,
    pub trip: TripId,
}

impl Connection {
    /// scan position of this connection: ascending departure time, with ties
    /// broken by trip id then feed id so that identical inputs always scan
    /// in the same order.
    pub fn scan_key(&self) -> (Time, TripId, FeedId) {
        (self.departure_time, self.trip, self.feed)
    }
}
