//! In-memory stop index with planar spatial indexing.
//!
//! A [`StopIndex`] is immutable once built. A dataset refresh builds a new
//! index from the new snapshot; nothing is updated in place.

use std::collections::HashMap;
use std::sync::Arc;

use geo::{Point, Rect};
use rstar::{RTree, AABB};
use tracing::debug;

use crate::identifiers::StopNumber;
use crate::models::types::*;
use crate::spatial::index::StopNode;
use crate::spatial::projection::BoundingExtent;
use crate::spatial::queries::haversine_distance;

/// Snapshot of every known stop with an R-tree over their planar positions
///
/// This type is cheap to clone since all records are stored in `Arc`s.
#[derive(Clone)]
pub struct StopIndex {
    stops: Vec<Arc<StopRecord>>,
    stop_map: HashMap<StopNumber, Arc<StopRecord>>,
    extent: BoundingExtent,
    stop_tree: RTree<StopNode>,
}

impl StopIndex {
    /// Build an index over a complete stop set
    ///
    /// Fails on an empty set, on a repeated stop number, and on coordinates
    /// outside the valid latitude/longitude ranges.
    pub fn build(stops: Vec<StopRecord>) -> Result<Self> {
        if stops.is_empty() {
            return Err(TransitError::EmptyStopSet);
        }

        let mut stop_map = HashMap::with_capacity(stops.len());
        let mut records = Vec::with_capacity(stops.len());

        for stop in stops {
            stop.validate()?;

            let stop = Arc::new(stop);
            if stop_map.insert(stop.number.clone(), stop.clone()).is_some() {
                return Err(TransitError::DuplicateStopNumber(stop.number.clone()));
            }
            records.push(stop);
        }

        let extent = BoundingExtent::from_stops(records.iter().map(|s| s.as_ref()))?;

        let stop_tree = RTree::bulk_load(
            records
                .iter()
                .map(|s| StopNode::new(extent.normalize(s.location), s.clone()))
                .collect(),
        );

        debug!(
            stops = records.len(),
            width_m = extent.width_m,
            height_m = extent.height_m,
            "built stop index"
        );

        Ok(Self {
            stops: records,
            stop_map,
            extent,
            stop_tree,
        })
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn extent(&self) -> &BoundingExtent {
        &self.extent
    }

    pub fn stops(&self) -> &[Arc<StopRecord>] {
        &self.stops
    }

    /// Look up a stop by its rider-facing number
    pub fn get(&self, number: &str) -> Option<Arc<StopRecord>> {
        self.stop_map.get(number).cloned()
    }

    /// Find every stop within `radius_m` meters of `center`
    ///
    /// Candidates come from the planar R-tree; each is then checked against
    /// its exact Haversine distance, so every returned stop is within the
    /// radius. Stops close to the radius can still be missed by the planar
    /// pre-filter far from the reference corner. Results are ascending by
    /// distance.
    pub fn query(&self, center: Point, radius_m: f64) -> Result<Vec<StopMatch>> {
        if radius_m < 0.0 || !radius_m.is_finite() {
            return Err(TransitError::InvalidRadius(radius_m));
        }
        check_query_point(center)?;

        let planar_center = self.extent.normalize(center).to_array();
        let planar_radius = self.extent.to_planar_radius(radius_m);

        let mut matches: Vec<StopMatch> = self
            .stop_tree
            .locate_within_distance(planar_center, planar_radius * planar_radius)
            .filter_map(|node| {
                let distance = haversine_distance(center, node.stop.location);
                (distance <= radius_m).then(|| StopMatch::new(node.stop.clone(), distance))
            })
            .collect();

        sort_by_distance(&mut matches);
        Ok(matches)
    }

    /// The `n` stops closest to `center`, ascending by distance
    ///
    /// Scans every stop with the exact distance, so the result is exact; it
    /// holds fewer than `n` entries only when the index does.
    pub fn nearest(&self, center: Point, n: usize) -> Result<Vec<StopMatch>> {
        check_query_point(center)?;

        let mut matches: Vec<StopMatch> = self
            .stops
            .iter()
            .map(|stop| StopMatch::new(stop.clone(), haversine_distance(center, stop.location)))
            .collect();

        sort_by_distance(&mut matches);
        matches.truncate(n);
        Ok(matches)
    }

    /// Every stop inside a latitude/longitude rectangle (a map viewport)
    ///
    /// Ascending by distance from the rectangle's center.
    pub fn query_region(&self, region: Rect) -> Result<Vec<StopMatch>> {
        let (min, max) = (region.min(), region.max());
        check_query_point(min.into())?;
        check_query_point(max.into())?;

        let envelope = AABB::from_corners(
            self.extent.normalize(min.into()).to_array(),
            self.extent.normalize(max.into()).to_array(),
        );
        let center: Point = region.center().into();

        // A collapsed axis maps every longitude (or latitude) to 0, so the
        // envelope alone can over-select; confirm on the true coordinate.
        let mut matches: Vec<StopMatch> = self
            .stop_tree
            .locate_in_envelope(&envelope)
            .filter(|node| {
                let location = node.stop.location;
                (min.x..=max.x).contains(&location.x()) && (min.y..=max.y).contains(&location.y())
            })
            .map(|node| StopMatch::new(node.stop.clone(), haversine_distance(center, node.stop.location)))
            .collect();

        sort_by_distance(&mut matches);
        Ok(matches)
    }
}

fn check_query_point(point: Point) -> Result<()> {
    if point.x().is_finite() && point.y().is_finite() {
        Ok(())
    } else {
        Err(TransitError::InvalidData(format!(
            "query point ({}, {}) is not finite",
            point.y(),
            point.x()
        )))
    }
}

/// Ascending by distance; equal distances fall back to stop number so
/// results are deterministic.
fn sort_by_distance(matches: &mut [StopMatch]) {
    matches.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.stop.number.cmp(&b.stop.number))
    });
}
