//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Haversine distance carrying the sign of `to - from` along the axis that differs
///
/// Used for distances measured along a single parallel or meridian, where the
/// sign tells which side of the reference line a point falls on.
pub(crate) fn signed_axis_distance(from: Point, to: Point, delta: f64) -> f64 {
    let distance = haversine_distance(from, to);
    if delta < 0.0 {
        -distance
    } else {
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_distance() {
        // Christchurch to Auckland is approximately 764 km
        let christchurch = Point::new(172.6362, -43.5321);
        let auckland = Point::new(174.7633, -36.8485);

        let dist = haversine_distance(christchurch, auckland);
        assert!((dist - 764_000.0).abs() < 10_000.0); // Within 10km
    }

    #[test]
    fn test_haversine_distance_is_zero_for_same_point() {
        let p = Point::new(172.6314, -43.5309);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_signed_axis_distance() {
        let reference = Point::new(172.60, -43.55);
        let east = Point::new(172.61, -43.55);

        let forward = signed_axis_distance(reference, east, east.x() - reference.x());
        let backward = signed_axis_distance(east, reference, reference.x() - east.x());

        assert!(forward > 0.0);
        assert_relative_eq!(forward, -backward);
    }
}
