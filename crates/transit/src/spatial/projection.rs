//! Local planar projection of stop coordinates.
//!
//! Every coordinate is mapped to a plane anchored at the south-west corner of
//! the stop set's bounding extent:
//!
//! - `x` is the great-circle distance along the extent's southern parallel,
//!   divided by the extent width
//! - `y` is the great-circle distance along the extent's western meridian,
//!   divided by the extent height
//!
//! Both distances are signed, so points west or south of the corner land at
//! negative coordinates instead of folding back into the covered area. Inside
//! the extent both axes fall in `[0, 1]`.
//!
//! This is only a metro-scale approximation. It treats two one-dimensional
//! distances as a Euclidean plane and degrades near the poles and the
//! antimeridian. Distances reported to callers are always recomputed with
//! Haversine on the true coordinates.

use geo::Point;

use crate::models::types::{Result, StopRecord, TransitError};
use crate::spatial::queries::signed_axis_distance;

/// A stop coordinate remapped into the normalized local plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Latitude/longitude extrema of a stop set and the plane derived from them
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingExtent {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    /// `(min_latitude, min_longitude)`, the origin of the plane
    pub reference_point: Point,
    /// Distance from the reference point to `(min_latitude, max_longitude)`
    pub width_m: f64,
    /// Distance from the reference point to `(max_latitude, min_longitude)`
    pub height_m: f64,
}

impl BoundingExtent {
    /// Compute the extent of a stop set
    ///
    /// Fails with [`TransitError::EmptyStopSet`] when there are no stops.
    pub fn from_stops<'a>(stops: impl IntoIterator<Item = &'a StopRecord>) -> Result<Self> {
        Self::from_points(stops.into_iter().map(|stop| stop.location))
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Result<Self> {
        let mut points = points.into_iter();
        let first = points.next().ok_or(TransitError::EmptyStopSet)?;

        let (mut min_lat, mut max_lat) = (first.y(), first.y());
        let (mut min_lon, mut max_lon) = (first.x(), first.x());

        for point in points {
            min_lat = min_lat.min(point.y());
            max_lat = max_lat.max(point.y());
            min_lon = min_lon.min(point.x());
            max_lon = max_lon.max(point.x());
        }

        let reference_point = Point::new(min_lon, min_lat);
        let width_m = signed_axis_distance(
            reference_point,
            Point::new(max_lon, min_lat),
            max_lon - min_lon,
        );
        let height_m = signed_axis_distance(
            reference_point,
            Point::new(min_lon, max_lat),
            max_lat - min_lat,
        );

        Ok(Self {
            min_latitude: min_lat,
            max_latitude: max_lat,
            min_longitude: min_lon,
            max_longitude: max_lon,
            reference_point,
            width_m,
            height_m,
        })
    }

    /// Map a geographic coordinate into the plane
    ///
    /// A zero-length axis (every stop on one meridian or parallel) collapses
    /// to 0 for all points rather than dividing by zero.
    pub fn normalize(&self, coordinate: Point) -> PlanarPoint {
        let x = if self.width_m > 0.0 {
            let along_parallel = signed_axis_distance(
                self.reference_point,
                Point::new(coordinate.x(), self.min_latitude),
                coordinate.x() - self.min_longitude,
            );
            along_parallel / self.width_m
        } else {
            0.0
        };

        let y = if self.height_m > 0.0 {
            let along_meridian = signed_axis_distance(
                self.reference_point,
                Point::new(self.min_longitude, coordinate.y()),
                coordinate.y() - self.min_latitude,
            );
            along_meridian / self.height_m
        } else {
            0.0
        };

        PlanarPoint::new(x, y)
    }

    /// Convert a physical radius into plane units
    ///
    /// Divides by the shorter extent side, ignoring the anisotropy between the
    /// axes, so the result is only approximate away from the reference corner.
    /// When both axes are degenerate every stop sits at the origin and the
    /// radius is unbounded.
    pub fn to_planar_radius(&self, radius_m: f64) -> f64 {
        let scale = match (self.width_m > 0.0, self.height_m > 0.0) {
            (true, true) => self.width_m.min(self.height_m),
            (true, false) => self.width_m,
            (false, true) => self.height_m,
            (false, false) => return f64::INFINITY,
        };

        radius_m / scale
    }

    /// Whether a coordinate lies inside the latitude/longitude extrema
    pub fn contains(&self, coordinate: Point) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coordinate.y())
            && (self.min_longitude..=self.max_longitude).contains(&coordinate.x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::queries::haversine_distance;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn christchurch_corners() -> Vec<Point> {
        vec![
            Point::new(172.55, -43.58),
            Point::new(172.70, -43.58),
            Point::new(172.55, -43.48),
            Point::new(172.70, -43.48),
            Point::new(172.63, -43.53),
        ]
    }

    #[test]
    fn test_extent_bounds_and_dimensions() {
        let extent = BoundingExtent::from_points(christchurch_corners()).unwrap();

        assert_eq!(extent.min_latitude, -43.58);
        assert_eq!(extent.max_latitude, -43.48);
        assert_eq!(extent.min_longitude, 172.55);
        assert_eq!(extent.max_longitude, 172.70);
        assert_eq!(extent.reference_point, Point::new(172.55, -43.58));

        assert_relative_eq!(
            extent.width_m,
            haversine_distance(Point::new(172.55, -43.58), Point::new(172.70, -43.58))
        );
        assert_relative_eq!(
            extent.height_m,
            haversine_distance(Point::new(172.55, -43.58), Point::new(172.55, -43.48))
        );
        assert!(extent.width_m > 12_000.0 && extent.width_m < 12_200.0);
        assert!(extent.height_m > 11_000.0 && extent.height_m < 11_200.0);
    }

    #[test]
    fn test_empty_extent_is_an_error() {
        let result = BoundingExtent::from_points(Vec::new());
        assert!(matches!(result, Err(TransitError::EmptyStopSet)));
    }

    #[test]
    fn test_normalize_corners_and_interior() {
        let extent = BoundingExtent::from_points(christchurch_corners()).unwrap();

        let origin = extent.normalize(Point::new(172.55, -43.58));
        assert_abs_diff_eq!(origin.x, 0.0);
        assert_abs_diff_eq!(origin.y, 0.0);

        let far = extent.normalize(Point::new(172.70, -43.48));
        assert_abs_diff_eq!(far.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(far.y, 1.0, epsilon = 1e-9);

        for point in christchurch_corners() {
            let planar = extent.normalize(point);
            assert!((0.0..=1.0 + 1e-9).contains(&planar.x));
            assert!((0.0..=1.0 + 1e-9).contains(&planar.y));
        }
    }

    #[test]
    fn test_normalize_outside_extent_is_signed() {
        let extent = BoundingExtent::from_points(christchurch_corners()).unwrap();

        let south_west = extent.normalize(Point::new(172.50, -43.60));
        assert!(south_west.x < 0.0);
        assert!(south_west.y < 0.0);

        let north_east = extent.normalize(Point::new(172.80, -43.40));
        assert!(north_east.x > 1.0);
        assert!(north_east.y > 1.0);
    }

    #[test]
    fn test_planar_radius_uses_shorter_side() {
        let extent = BoundingExtent::from_points(christchurch_corners()).unwrap();
        let shorter = extent.width_m.min(extent.height_m);

        assert_relative_eq!(extent.to_planar_radius(500.0), 500.0 / shorter);
        assert_eq!(extent.to_planar_radius(0.0), 0.0);
    }

    #[test]
    fn test_degenerate_axis_collapses_to_zero() {
        // Every stop on the same meridian: zero width, positive height
        let extent = BoundingExtent::from_points(vec![
            Point::new(172.63, -43.54),
            Point::new(172.63, -43.52),
        ])
        .unwrap();

        assert_eq!(extent.width_m, 0.0);
        assert!(extent.height_m > 0.0);

        let planar = extent.normalize(Point::new(172.64, -43.53));
        assert_eq!(planar.x, 0.0);
        assert!(planar.y.is_finite());
        assert_relative_eq!(extent.to_planar_radius(100.0), 100.0 / extent.height_m);
    }

    #[test]
    fn test_single_point_extent() {
        let extent = BoundingExtent::from_points(vec![Point::new(172.63, -43.53)]).unwrap();

        assert_eq!(extent.width_m, 0.0);
        assert_eq!(extent.height_m, 0.0);
        assert_eq!(
            extent.normalize(Point::new(172.70, -43.60)),
            PlanarPoint::new(0.0, 0.0)
        );
        assert_eq!(extent.to_planar_radius(10.0), f64::INFINITY);
    }

    #[test]
    fn test_contains() {
        let extent = BoundingExtent::from_points(christchurch_corners()).unwrap();
        assert!(extent.contains(Point::new(172.60, -43.50)));
        assert!(!extent.contains(Point::new(172.40, -43.50)));
    }
}
