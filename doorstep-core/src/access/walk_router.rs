use crate::model::Time;
use geo::{Distance, Haversine, Point};

/// point-to-point walking durations on the road network. implementations
/// wrap whatever road routing is available; the core only depends on this
/// contract.
pub trait WalkRouter: Send + Sync {
    /// walking duration from `from` to `to`, or `None` when the road
    /// network offers no path between the two points.
    fn walking_time(&self, from: Point<f64>, to: Point<f64>) -> Option<Time>;

    /// meters a walk of `duration` can possibly span, used to bound spatial
    /// candidate queries before routing.
    fn coverage_radius(&self, duration: Time) -> f64;
}

/// crow-flies stand-in for a road-network router: haversine distance at a
/// constant walking speed. real deployments substitute an implementation
/// backed by the road graph behind the same trait.
#[derive(Debug, Clone)]
pub struct HaversineWalkRouter {
    /// walking speed in meters per second.
    pub speed: f64,
}

impl HaversineWalkRouter {
    pub fn new(speed: f64) -> HaversineWalkRouter {
        HaversineWalkRouter { speed }
    }
}

impl Default for HaversineWalkRouter {
    fn default() -> Self {
        // preferred pedestrian speed, m/s
        HaversineWalkRouter::new(1.4)
    }
}

impl WalkRouter for HaversineWalkRouter {
    fn walking_time(&self, from: Point<f64>, to: Point<f64>) -> Option<Time> {
        let meters = Haversine.distance(from, to);
        Some((meters / self.speed).ceil() as Time)
    }

    fn coverage_radius(&self, duration: Time) -> f64 {
        self.speed * duration as f64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::point;

    #[test]
    fn test_walking_time_scales_with_speed() {
        // roughly 111m apart along a meridian
        let a = point! { x: 0.0, y: 0.0 };
        let b = point! { x: 0.0, y: 0.001 };
        let slow = HaversineWalkRouter::new(1.0).walking_time(a, b).unwrap();
        let fast = HaversineWalkRouter::new(2.0).walking_time(a, b).unwrap();
        assert!((110..=112).contains(&slow));
        assert!((55..=56).contains(&fast));
    }

    #[test]
    fn test_coverage_radius_bounds_walking_time() {
        let router = HaversineWalkRouter::default();
        let radius = router.coverage_radius(600);
        assert_eq!(radius, 1.4 * 600.0);
    }
}
