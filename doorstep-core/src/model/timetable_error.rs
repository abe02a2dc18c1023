use super::{FeedId, StopId, Time, TripId};

/// ingestion-time failures. each rejects only the offending call or batch;
/// entities already registered stay valid.
#[derive(thiserror::Error, Debug)]
pub enum TimetableError {
    #[error("unknown {0} referenced during registration")]
    UnknownFeed(FeedId),
    #[error("connection in {feed} references {stop}, which is not registered to that feed")]
    UnknownStop { feed: FeedId, stop: StopId },
    #[error("connection in {feed} references {trip}, which is not registered to that feed")]
    UnknownTrip { feed: FeedId, trip: TripId },
    #[error("connection on {trip} arrives at {arrival} no later than it departs at {departure}")]
    NonPositiveTravelTime {
        trip: TripId,
        departure: Time,
        arrival: Time,
    },
    #[error("{trip} departs {departure_stop} at {departure} before its previous connection arrives at {previous_arrival}")]
    TripTimesNotMonotonic {
        trip: TripId,
        departure_stop: StopId,
        departure: Time,
        previous_arrival: Time,
    },
}
