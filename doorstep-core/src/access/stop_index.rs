//! R-tree over stop locations.
//!
//! Radius queries run in two stages: a fast euclidean filter in degree space
//! inside the R-tree, then an accurate haversine filter on the candidates.
//! The degree-space radius is padded for latitude so the first stage never
//! drops a stop the second stage would have kept.

use crate::model::{Stop, StopId};
use geo::{Distance, Haversine, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// meters per degree of latitude, and per degree of longitude at the
/// equator.
const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone)]
struct StopNode {
    stop: StopId,
    point: [f64; 2],
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// read-only spatial index over a timetable's stops.
#[derive(Debug)]
pub struct StopIndex {
    tree: RTree<StopNode>,
}

impl StopIndex {
    pub fn new(stops: &[Stop]) -> StopIndex {
        let nodes = stops
            .iter()
            .map(|s| StopNode {
                stop: s.id,
                point: [s.location.x(), s.location.y()],
            })
            .collect();
        StopIndex {
            tree: RTree::bulk_load(nodes),
        }
    }

    /// stops within `radius_meters` of `point`, nearest first. ties on
    /// distance resolve by stop id so candidate order is reproducible.
    pub fn within_radius(&self, point: Point<f64>, radius_meters: f64) -> Vec<(StopId, f64)> {
        // degree-space prefilter radius, widened by the latitude's longitude
        // compression so it over-covers rather than under-covers
        let lat_scale = point.y().to_radians().cos().abs().max(0.01);
        let degrees = radius_meters / METERS_PER_DEGREE / lat_scale;
        let mut matches: Vec<(StopId, f64)> = self
            .tree
            .locate_within_distance([point.x(), point.y()], degrees * degrees)
            .filter_map(|node| {
                let meters =
                    Haversine.distance(point, Point::new(node.point[0], node.point[1]));
                (meters <= radius_meters).then_some((node.stop, meters))
            })
            .collect();
        matches.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        matches
    }
}
