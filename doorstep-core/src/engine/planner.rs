use super::itinerary::{build_itinerary, Itinerary};
use super::journey_error::JourneyError;
use super::scan::{scan, ScanLimits};
use super::state::ScanState;
use crate::access::{AccessDirection, AccessResolver};
use crate::model::{Time, Timetable};
use crate::transfer::{ProfileId, TransferTable};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// one earliest-arrival query: door coordinates, a departure time, and the
/// travel profile governing walks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct JourneyRequest {
    pub origin: Point<f64>,
    pub destination: Point<f64>,
    pub departure_time: Time,
    pub profile: ProfileId,
    #[serde(default)]
    pub limits: ScanLimits,
}

/// ties the read-only stores and the resolver together into the full query
/// pipeline: resolve access, scan, reconstruct. one planner serves many
/// concurrent queries; only the per-query [`ScanState`] is exclusive.
pub struct JourneyPlanner<R> {
    timetable: Arc<Timetable>,
    transfers: Arc<TransferTable>,
    resolver: R,
}

impl<R: AccessResolver> JourneyPlanner<R> {
    pub fn new(
        timetable: Arc<Timetable>,
        transfers: Arc<TransferTable>,
        resolver: R,
    ) -> Self {
        JourneyPlanner {
            timetable,
            transfers,
            resolver,
        }
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// fresh scratch state sized to this planner's timetable. callers
    /// running query loops allocate one per worker and reuse it.
    pub fn scratch(&self) -> ScanState {
        ScanState::new(self.timetable.stop_count(), self.timetable.trip_count())
    }

    /// plans with a one-off scratch allocation.
    pub fn plan(&self, request: &JourneyRequest) -> Result<Itinerary, JourneyError> {
        let mut state = self.scratch();
        self.plan_with(request, &mut state)
    }

    /// plans using caller-owned scratch state, which must not be shared
    /// with any concurrently running query.
    pub fn plan_with(
        &self,
        request: &JourneyRequest,
        state: &mut ScanState,
    ) -> Result<Itinerary, JourneyError> {
        let origins =
            self.resolver
                .resolve(request.origin, request.profile, AccessDirection::Access)?;
        let destinations = self.resolver.resolve(
            request.destination,
            request.profile,
            AccessDirection::Egress,
        )?;
        let outcome = scan(
            &self.timetable,
            &self.transfers,
            request.profile,
            &origins,
            &destinations,
            request.departure_time,
            request.limits,
            state,
        )
        .ok_or(JourneyError::NoRouteFound)?;
        log::debug!(
            "query departing {} arrives {} via {}",
            request.departure_time,
            outcome.final_arrival,
            outcome.egress.stop
        );
        Ok(build_itinerary(
            &self.timetable,
            state,
            request.departure_time,
            &outcome,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access::{HaversineWalkRouter, NetworkAccessResolver};
    use crate::engine::itinerary::Leg;
    use crate::model::TimetableBuilder;
    use crate::transfer::TransferTableBuilder;
    use geo::point;
    use std::sync::Arc;

    /// two stops ~1.1km apart on a meridian, well beyond the 400m resolver
    /// radius, with one 08:10 -> 08:20 connection between them.
    fn planner() -> JourneyPlanner<NetworkAccessResolver<HaversineWalkRouter>> {
        let mut builder = TimetableBuilder::new();
        let feed = builder.register_feed();
        let a = builder.add_stop(feed, point! { x: 0.0, y: 0.0 }).unwrap();
        let b = builder.add_stop(feed, point! { x: 0.0, y: 0.01 }).unwrap();
        let trip = builder.add_trip(feed).unwrap();
        builder
            .add_connection(feed, a, 29400, b, 30000, trip)
            .unwrap();
        let timetable = Arc::new(builder.finalize().unwrap());

        let router = HaversineWalkRouter::new(1.0);
        let mut transfers = TransferTable::new();
        TransferTableBuilder::new(300).build(&timetable, &router, ProfileId(0), &mut transfers);
        let resolver = NetworkAccessResolver::new(&timetable, router, 400.0);
        JourneyPlanner::new(timetable, Arc::new(transfers), resolver)
    }

    fn request(departure_time: Time) -> JourneyRequest {
        JourneyRequest {
            origin: point! { x: 0.0, y: 0.0 },
            destination: point! { x: 0.0, y: 0.01 },
            departure_time,
            profile: ProfileId(0),
            limits: ScanLimits::default(),
        }
    }

    #[test]
    fn test_door_to_door_ride() {
        let planner = planner();
        let itinerary = planner.plan(&request(28800)).unwrap();
        assert_eq!(itinerary.arrival_time, 30000);
        assert_eq!(itinerary.total_duration(), 1200);
        // the doors sit exactly on the stops, so the only leg is the ride
        assert_eq!(itinerary.legs.len(), 1);
        assert!(matches!(itinerary.legs[0], Leg::Ride { .. }));
    }

    #[test]
    fn test_door_on_stop_is_zero_duration_journey() {
        let planner = planner();
        let mut request = request(28800);
        request.destination = request.origin;
        let itinerary = planner.plan(&request).unwrap();
        assert!(itinerary.legs.is_empty());
        assert_eq!(itinerary.total_duration(), 0);
    }

    #[test]
    fn test_missed_connection_is_no_route() {
        let planner = planner();
        // one second past the only departure, and the destination is far
        // beyond walking range
        assert!(matches!(
            planner.plan(&request(29401)),
            Err(JourneyError::NoRouteFound)
        ));
    }

    #[test]
    fn test_doors_near_one_stop_walk_only() {
        let planner = planner();
        // both doors resolve to stop A alone; the journey is two walks
        // through it with no transit involved
        let request = JourneyRequest {
            origin: point! { x: -0.0005, y: 0.0 },
            destination: point! { x: 0.0007, y: 0.0 },
            departure_time: 43200,
            profile: ProfileId(0),
            limits: ScanLimits::default(),
        };
        let itinerary = planner.plan(&request).unwrap();
        assert_eq!(itinerary.legs.len(), 2);
        assert!(itinerary
            .legs
            .iter()
            .all(|leg| matches!(leg, Leg::Walk { .. })));
    }

    #[test]
    fn test_unresolvable_origin() {
        let planner = planner();
        let mut request = request(28800);
        request.origin = point! { x: 10.0, y: 10.0 };
        let result = planner.plan(&request);
        assert!(matches!(
            result,
            Err(JourneyError::UnresolvableLocation(_))
        ));
    }

    #[test]
    fn test_plans_are_deterministic_across_scratch_reuse() {
        let planner = planner();
        let mut state = planner.scratch();
        let first = planner.plan_with(&request(28800), &mut state).unwrap();
        let second = planner.plan_with(&request(28800), &mut state).unwrap();
        assert_eq!(first, second);
    }
}
