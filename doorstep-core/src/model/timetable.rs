use super::{Connection, FeedId, Stop, StopId, Time, TimetableError, Trip, TripId};
use geo::Point;
use itertools::Itertools;

/// batch ingestion side of the timetable. feeds register themselves, then
/// add stops, trips, and connections in any order; [`Self::finalize`] merges
/// everything into the immutable, scan-ordered [`Timetable`].
///
/// validation happens as early as possible: a connection referencing an
/// entity its own feed never registered is rejected on the spot and leaves
/// previously added data untouched.
#[derive(Debug, Default)]
pub struct TimetableBuilder {
    stops: Vec<Stop>,
    trips: Vec<Trip>,
    connections: Vec<Connection>,
    feed_count: usize,
}

impl TimetableBuilder {
    pub fn new() -> TimetableBuilder {
        TimetableBuilder::default()
    }

    pub fn register_feed(&mut self) -> FeedId {
        let id = FeedId(self.feed_count);
        self.feed_count += 1;
        id
    }

    /// registers a stop under `feed` and returns its globally assigned id.
    pub fn add_stop(&mut self, feed: FeedId, location: Point<f64>) -> Result<StopId, TimetableError> {
        self.check_feed(feed)?;
        let id = StopId(self.stops.len());
        self.stops.push(Stop { id, feed, location });
        Ok(id)
    }

    /// registers a trip under `feed` and returns its globally assigned id.
    pub fn add_trip(&mut self, feed: FeedId) -> Result<TripId, TimetableError> {
        self.check_feed(feed)?;
        let id = TripId(self.trips.len());
        self.trips.push(Trip { id, feed });
        Ok(id)
    }

    /// registers one scheduled connection. stops and trip must already be
    /// registered to the same feed, and travel time must be positive.
    pub fn add_connection(
        &mut self,
        feed: FeedId,
        departure_stop: StopId,
        departure_time: Time,
        arrival_stop: StopId,
        arrival_time: Time,
        trip: TripId,
    ) -> Result<(), TimetableError> {
        self.check_feed(feed)?;
        self.check_stop(feed, departure_stop)?;
        self.check_stop(feed, arrival_stop)?;
        self.check_trip(feed, trip)?;
        if arrival_time <= departure_time {
            return Err(TimetableError::NonPositiveTravelTime {
                trip,
                departure: departure_time,
                arrival: arrival_time,
            });
        }
        self.connections.push(Connection {
            feed,
            departure_stop,
            departure_time,
            arrival_stop,
            arrival_time,
            trip,
        });
        Ok(())
    }

    /// sorts the merged connection sequence into scan order and validates
    /// that every trip's connections are time-consistent along its run.
    pub fn finalize(mut self) -> Result<Timetable, TimetableError> {
        self.connections.sort_by_key(Connection::scan_key);
        validate_trip_monotonicity(&self.connections)?;

        log::debug!(
            "finalized timetable: {} feeds, {} stops, {} trips, {} connections",
            self.feed_count,
            self.stops.len(),
            self.trips.len(),
            self.connections.len()
        );
        Ok(Timetable {
            stops: self.stops,
            trips: self.trips,
            connections: self.connections,
            feed_count: self.feed_count,
        })
    }

    fn check_feed(&self, feed: FeedId) -> Result<(), TimetableError> {
        if feed.0 >= self.feed_count {
            return Err(TimetableError::UnknownFeed(feed));
        }
        Ok(())
    }

    fn check_stop(&self, feed: FeedId, stop: StopId) -> Result<(), TimetableError> {
        match self.stops.get(stop.0) {
            Some(s) if s.feed == feed => Ok(()),
            _ => Err(TimetableError::UnknownStop { feed, stop }),
        }
    }

    fn check_trip(&self, feed: FeedId, trip: TripId) -> Result<(), TimetableError> {
        match self.trips.get(trip.0) {
            Some(t) if t.feed == feed => Ok(()),
            _ => Err(TimetableError::UnknownTrip { feed, trip }),
        }
    }
}

/// per-trip monotonicity: a trip cannot depart a stop before its previous
/// connection has arrived there.
fn validate_trip_monotonicity(connections: &[Connection]) -> Result<(), TimetableError> {
    let by_trip = connections
        .iter()
        .sorted_by_key(|c| (c.trip, c.departure_time))
        .chunk_by(|c| c.trip);
    for (_, run) in &by_trip {
        for (prev, next) in run.tuple_windows() {
            if next.departure_time < prev.arrival_time {
                return Err(TimetableError::TripTimesNotMonotonic {
                    trip: next.trip,
                    departure_stop: next.departure_stop,
                    departure: next.departure_time,
                    previous_arrival: prev.arrival_time,
                });
            }
        }
    }
    Ok(())
}

/// the finalized, read-only store. cheap to share across query threads;
/// nothing here mutates after [`TimetableBuilder::finalize`].
#[derive(Debug)]
pub struct Timetable {
    stops: Vec<Stop>,
    trips: Vec<Trip>,
    /// ascending by (departure time, trip id, feed id).
    connections: Vec<Connection>,
    feed_count: usize,
}

impl Timetable {
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id.0)
    }

    pub fn trip(&self, id: TripId) -> Option<&Trip> {
        self.trips.get(id.0)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// the scan-ordered view over all feeds.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn feed_count(&self) -> usize {
        self.feed_count
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// index of the first connection departing at or after `bound`, found by
    /// binary search so scans can resume from an arbitrary lower bound.
    pub fn first_departure_at_or_after(&self, bound: Time) -> usize {
        self.connections
            .partition_point(|c| c.departure_time < bound)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::point;

    fn builder_with_feed() -> (TimetableBuilder, FeedId) {
        let mut builder = TimetableBuilder::new();
        let feed = builder.register_feed();
        (builder, feed)
    }

    fn add_stops(builder: &mut TimetableBuilder, feed: FeedId, n: usize) -> Vec<StopId> {
        (0..n)
            .map(|i| {
                builder
                    .add_stop(feed, point! { x: i as f64 * 0.01, y: 0.0 })
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_assigns_dense_ids_across_feeds() {
        let mut builder = TimetableBuilder::new();
        let feed_a = builder.register_feed();
        let feed_b = builder.register_feed();
        let s0 = builder.add_stop(feed_a, point! { x: 0.0, y: 0.0 }).unwrap();
        let s1 = builder.add_stop(feed_b, point! { x: 0.1, y: 0.0 }).unwrap();
        assert_eq!(s0, StopId(0));
        assert_eq!(s1, StopId(1));
        let t0 = builder.add_trip(feed_b).unwrap();
        assert_eq!(t0, TripId(0));
    }

    #[test]
    fn test_rejects_connection_with_unregistered_stop() {
        let (mut builder, feed) = builder_with_feed();
        let stops = add_stops(&mut builder, feed, 1);
        let trip = builder.add_trip(feed).unwrap();
        let missing = StopId(99);
        let result = builder.add_connection(feed, stops[0], 100, missing, 200, trip);
        assert!(matches!(
            result,
            Err(TimetableError::UnknownStop { stop, .. }) if stop == missing
        ));
        // the rejected call must not have added anything
        let timetable = builder.finalize().unwrap();
        assert_eq!(timetable.connections().len(), 0);
    }

    #[test]
    fn test_rejects_stop_registered_to_another_feed() {
        let mut builder = TimetableBuilder::new();
        let feed_a = builder.register_feed();
        let feed_b = builder.register_feed();
        let foreign = builder.add_stop(feed_a, point! { x: 0.0, y: 0.0 }).unwrap();
        let local = builder.add_stop(feed_b, point! { x: 0.1, y: 0.0 }).unwrap();
        let trip = builder.add_trip(feed_b).unwrap();
        let result = builder.add_connection(feed_b, foreign, 100, local, 200, trip);
        assert!(matches!(result, Err(TimetableError::UnknownStop { .. })));
    }

    #[test]
    fn test_rejects_non_positive_travel_time() {
        let (mut builder, feed) = builder_with_feed();
        let stops = add_stops(&mut builder, feed, 2);
        let trip = builder.add_trip(feed).unwrap();
        let result = builder.add_connection(feed, stops[0], 200, stops[1], 200, trip);
        assert!(matches!(
            result,
            Err(TimetableError::NonPositiveTravelTime { .. })
        ));
    }

    #[test]
    fn test_finalize_sorts_with_deterministic_tie_break() {
        let mut builder = TimetableBuilder::new();
        let feed_a = builder.register_feed();
        let feed_b = builder.register_feed();
        let a0 = builder.add_stop(feed_a, point! { x: 0.0, y: 0.0 }).unwrap();
        let a1 = builder.add_stop(feed_a, point! { x: 0.1, y: 0.0 }).unwrap();
        let b0 = builder.add_stop(feed_b, point! { x: 0.2, y: 0.0 }).unwrap();
        let b1 = builder.add_stop(feed_b, point! { x: 0.3, y: 0.0 }).unwrap();
        let trip_a = builder.add_trip(feed_a).unwrap();
        let trip_b = builder.add_trip(feed_b).unwrap();
        // identical departure times across feeds, inserted out of order
        builder.add_connection(feed_b, b0, 100, b1, 200, trip_b).unwrap();
        builder.add_connection(feed_a, a0, 100, a1, 180, trip_a).unwrap();
        let timetable = builder.finalize().unwrap();
        let order: Vec<TripId> = timetable.connections().iter().map(|c| c.trip).collect();
        // tie on departure time resolves by trip id, then feed id
        assert_eq!(order, vec![trip_a, trip_b]);
    }

    #[test]
    fn test_finalize_rejects_trip_with_inconsistent_times() {
        let (mut builder, feed) = builder_with_feed();
        let stops = add_stops(&mut builder, feed, 3);
        let trip = builder.add_trip(feed).unwrap();
        builder
            .add_connection(feed, stops[0], 100, stops[1], 300, trip)
            .unwrap();
        // departs the next stop before the previous connection arrives
        builder
            .add_connection(feed, stops[1], 250, stops[2], 400, trip)
            .unwrap();
        let result = builder.finalize();
        assert!(matches!(
            result,
            Err(TimetableError::TripTimesNotMonotonic { .. })
        ));
    }

    #[test]
    fn test_first_departure_at_or_after() {
        let (mut builder, feed) = builder_with_feed();
        let stops = add_stops(&mut builder, feed, 2);
        for departure in [100u32, 200, 300] {
            let trip = builder.add_trip(feed).unwrap();
            builder
                .add_connection(feed, stops[0], departure, stops[1], departure + 50, trip)
                .unwrap();
        }
        let timetable = builder.finalize().unwrap();
        assert_eq!(timetable.first_departure_at_or_after(0), 0);
        assert_eq!(timetable.first_departure_at_or_after(100), 0);
        assert_eq!(timetable.first_departure_at_or_after(101), 1);
        assert_eq!(timetable.first_departure_at_or_after(300), 2);
        assert_eq!(timetable.first_departure_at_or_after(301), 3);
    }
}
