//! R-tree nodes for spatial indexing.
//!
//! Wraps stop records with their projected planar position.
//!
//! ## Two-Stage Filtering
//!
//! The spatial queries use a two-stage filtering approach:
//! 1. **R-tree filter**: Uses Euclidean distance in the normalized plane
//!    (see [`projection`](super::projection)) to select candidates
//! 2. **Haversine filter**: Applies accurate geodesic distance on the
//!    candidates' true coordinates
//!
//! The plane is only an approximation of the metro area, so the first stage
//! decides membership near the boundary while the second stage decides the
//! reported distance.

use std::sync::Arc;

use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::types::StopRecord;
use crate::spatial::projection::PlanarPoint;

// ============================================================================
// Stop Spatial Node
// ============================================================================

#[derive(Clone, Debug)]
pub struct StopNode {
    pub stop: Arc<StopRecord>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(planar: PlanarPoint, stop: Arc<StopRecord>) -> Self {
        Self {
            stop,
            point: planar.to_array(),
        }
    }

    pub fn planar(&self) -> PlanarPoint {
        PlanarPoint::new(self.point[0], self.point[1])
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use rstar::RTree;

    fn node(number: &str, x: f64, y: f64) -> StopNode {
        let stop = StopRecord::new(number, number, "Stop", "Road", Point::new(172.6, -43.5));
        StopNode::new(PlanarPoint::new(x, y), Arc::new(stop))
    }

    #[test]
    fn test_node_distance() {
        let n = node("1", 0.3, 0.4);
        assert_eq!(n.distance_2(&[0.0, 0.0]), 0.25);
        assert_eq!(n.planar(), PlanarPoint::new(0.3, 0.4));
    }

    #[test]
    fn test_nodes_in_rtree() {
        let tree = RTree::bulk_load(vec![
            node("a", 0.0, 0.0),
            node("b", 0.5, 0.5),
            node("c", 1.0, 1.0),
        ]);

        let mut hits: Vec<_> = tree
            .locate_within_distance([0.0, 0.0], 0.6)
            .map(|n| n.stop.number.to_string())
            .collect();
        hits.sort();

        // Squared distance to (0.5, 0.5) is 0.5, to (1.0, 1.0) is 2.0
        assert_eq!(hits, vec!["a", "b"]);
    }
}
