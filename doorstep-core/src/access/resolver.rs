use super::{StopIndex, WalkRouter};
use crate::model::{StopId, Time, Timetable};
use crate::transfer::ProfileId;
use geo::Point;
use serde::{Deserialize, Serialize};

/// whether a coordinate is being attached to the network as a journey's
/// starting point or its end point. egress durations are measured from the
/// stop to the coordinate, not the other way around.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDirection {
    Access,
    Egress,
}

/// one way of entering or leaving the transit network near a coordinate.
/// produced fresh per query, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessCandidate {
    pub stop: StopId,
    /// walking duration between the query coordinate and `stop`.
    pub duration: Time,
}

/// no stop or road attachment point within the resolver's search radius.
#[derive(thiserror::Error, Debug)]
#[error("no stop reachable within {radius_meters:.0}m of ({lon:.5}, {lat:.5}) for {profile}")]
pub struct UnresolvableLocation {
    pub lon: f64,
    pub lat: f64,
    pub radius_meters: f64,
    pub profile: ProfileId,
}

/// maps a geographic coordinate to nearby stops with walking durations.
/// the aggregate contract the engine depends on; everything behind it is a
/// collaborator.
pub trait AccessResolver: Send + Sync {
    fn resolve(
        &self,
        coordinate: Point<f64>,
        profile: ProfileId,
        direction: AccessDirection,
    ) -> Result<Vec<AccessCandidate>, UnresolvableLocation>;
}

/// the standard resolver: a spatial lookup proposes nearby stops, a
/// [`WalkRouter`] prices the walk to each. either sub-collaborator can be
/// swapped without the engine noticing.
pub struct NetworkAccessResolver<R> {
    index: StopIndex,
    locations: Vec<Point<f64>>,
    router: R,
    search_radius_meters: f64,
}

impl<R: WalkRouter> NetworkAccessResolver<R> {
    pub fn new(timetable: &Timetable, router: R, search_radius_meters: f64) -> Self {
        NetworkAccessResolver {
            index: StopIndex::new(timetable.stops()),
            locations: timetable.stops().iter().map(|s| s.location).collect(),
            router,
            search_radius_meters,
        }
    }
}

impl<R: WalkRouter> AccessResolver for NetworkAccessResolver<R> {
    fn resolve(
        &self,
        coordinate: Point<f64>,
        profile: ProfileId,
        direction: AccessDirection,
    ) -> Result<Vec<AccessCandidate>, UnresolvableLocation> {
        let candidates: Vec<AccessCandidate> = self
            .index
            .within_radius(coordinate, self.search_radius_meters)
            .into_iter()
            .filter_map(|(stop, _)| {
                let stop_location = self.locations[stop.0];
                let walk = match direction {
                    AccessDirection::Access => {
                        self.router.walking_time(coordinate, stop_location)
                    }
                    AccessDirection::Egress => {
                        self.router.walking_time(stop_location, coordinate)
                    }
                };
                walk.map(|duration| AccessCandidate { stop, duration })
            })
            .collect();
        if candidates.is_empty() {
            return Err(UnresolvableLocation {
                lon: coordinate.x(),
                lat: coordinate.y(),
                radius_meters: self.search_radius_meters,
                profile,
            });
        }
        log::debug!(
            "resolved ({:.5}, {:.5}) to {} candidate stops ({:?})",
            coordinate.x(),
            coordinate.y(),
            candidates.len(),
            direction
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access::HaversineWalkRouter;
    use crate::model::TimetableBuilder;
    use geo::point;

    fn two_stop_timetable() -> Timetable {
        let mut builder = TimetableBuilder::new();
        let feed = builder.register_feed();
        builder.add_stop(feed, point! { x: 0.0, y: 0.0 }).unwrap();
        builder.add_stop(feed, point! { x: 0.0, y: 0.002 }).unwrap();
        builder.finalize().unwrap()
    }

    #[test]
    fn test_resolve_returns_nearby_stops_with_durations() {
        let timetable = two_stop_timetable();
        let resolver =
            NetworkAccessResolver::new(&timetable, HaversineWalkRouter::new(1.0), 300.0);
        let candidates = resolver
            .resolve(point! { x: 0.0, y: 0.0005 }, ProfileId(0), AccessDirection::Access)
            .unwrap();
        assert_eq!(candidates.len(), 2);
        // both stops are within radius; walking durations reflect distance
        assert_eq!(candidates[0].stop, StopId(0));
        assert!(candidates[0].duration < candidates[1].duration);
    }

    #[test]
    fn test_resolve_fails_outside_search_radius() {
        let timetable = two_stop_timetable();
        let resolver =
            NetworkAccessResolver::new(&timetable, HaversineWalkRouter::default(), 200.0);
        let result = resolver.resolve(
            point! { x: 1.0, y: 1.0 },
            ProfileId(0),
            AccessDirection::Egress,
        );
        assert!(result.is_err());
    }
}
