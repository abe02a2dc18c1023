use crate::model::{StopId, Time, TripId, UNREACHED};

/// how a stop's current earliest arrival was achieved. walked once by the
/// itinerary builder after the scan finishes; never a live object graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reached {
    Unreached,
    /// seeded from an origin access candidate at query start.
    InitialAccess { walk: Time },
    /// improved by riding the connection at this index in scan order.
    ViaConnection { connection: usize },
    /// improved by a precomputed walking transfer out of `from`.
    ViaTransfer { from: StopId, walk: Time },
}

/// per-query scratch state, sized to the timetable's stop and trip counts.
/// exclusively owned by one running query; reset and reuse it rather than
/// reallocating when running many queries on one thread.
#[derive(Debug)]
pub struct ScanState {
    arrival: Vec<Time>,
    reached: Vec<Reached>,
    /// per trip, the scan-order index of the connection where the trip was
    /// first boarded. doubles as the "already boarded" flag and as the
    /// boarding point for ride-leg reconstruction.
    boarding: Vec<Option<usize>>,
}

impl ScanState {
    pub fn new(stop_count: usize, trip_count: usize) -> ScanState {
        ScanState {
            arrival: vec![UNREACHED; stop_count],
            reached: vec![Reached::Unreached; stop_count],
            boarding: vec![None; trip_count],
        }
    }

    pub fn reset(&mut self) {
        self.arrival.fill(UNREACHED);
        self.reached.fill(Reached::Unreached);
        self.boarding.fill(None);
    }

    pub fn arrival(&self, stop: StopId) -> Time {
        self.arrival[stop.0]
    }

    pub fn reached(&self, stop: StopId) -> Reached {
        self.reached[stop.0]
    }

    pub(crate) fn boarding(&self, trip: TripId) -> Option<usize> {
        self.boarding[trip.0]
    }

    pub(crate) fn mark_boarded(&mut self, trip: TripId, connection: usize) {
        self.boarding[trip.0] = Some(connection);
    }

    /// records `time` as the stop's earliest arrival if it strictly beats
    /// the incumbent. an equal time keeps the earlier-discovered path, so
    /// results follow scan order deterministically (and incidentally favor
    /// fewer transfers, which callers must not rely on).
    pub(crate) fn improve(&mut self, stop: StopId, time: Time, how: Reached) -> bool {
        if time < self.arrival[stop.0] {
            self.arrival[stop.0] = time;
            self.reached[stop.0] = how;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_improve_is_strict() {
        let mut state = ScanState::new(2, 1);
        assert!(state.improve(StopId(0), 100, Reached::InitialAccess { walk: 0 }));
        assert!(state.improve(
            StopId(0),
            90,
            Reached::ViaTransfer { from: StopId(1), walk: 10 }
        ));
        // an equal arrival keeps the incumbent back-pointer
        assert!(!state.improve(StopId(0), 90, Reached::ViaConnection { connection: 3 }));
        assert_eq!(state.arrival(StopId(0)), 90);
        assert_eq!(
            state.reached(StopId(0)),
            Reached::ViaTransfer { from: StopId(1), walk: 10 }
        );
    }

    #[test]
    fn test_reset_clears_all_labels() {
        let mut state = ScanState::new(2, 2);
        state.improve(StopId(1), 50, Reached::InitialAccess { walk: 5 });
        state.mark_boarded(TripId(1), 7);
        state.reset();
        assert_eq!(state.arrival(StopId(1)), UNREACHED);
        assert_eq!(state.reached(StopId(1)), Reached::Unreached);
        assert_eq!(state.boarding(TripId(1)), None);
    }
}
