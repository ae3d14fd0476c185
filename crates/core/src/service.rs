//! Shared stop-index service.
//!
//! One [`StopIndexService`] is created at start-up and handed by reference to
//! every feature that needs stop lookups (nearby-stop lists, the map region
//! loader, favourites).
//!
//! The current [`StopIndex`] sits behind an `Arc`. A rebuild constructs the new
//! index without holding any lock, then swaps the `Arc` under a short write
//! lock. Readers only hold the read lock long enough to clone the `Arc`, so a
//! query always runs against one complete snapshot, never a mix of old and new
//! data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::{Point, Rect};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::CoreResult;
use crate::favourites::{FavouriteEta, FavouriteStops};
use crate::transit::{StopIndex, StopMatch, StopNumber, StopRecord, StopSource, TransitError};

/// State of the index as published to subscribers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexStatus {
    /// Number of successful builds so far; 0 until the first one
    pub generation: u64,
    pub stop_count: usize,
    pub built_at: Option<DateTime<Utc>>,
}

impl IndexStatus {
    pub fn is_ready(&self) -> bool {
        self.generation > 0
    }
}

pub struct StopIndexService {
    config: ServiceConfig,
    current: RwLock<Option<Arc<StopIndex>>>,
    status: watch::Sender<IndexStatus>,
}

impl StopIndexService {
    pub fn new(config: ServiceConfig) -> Self {
        let (status, _) = watch::channel(IndexStatus::default());
        Self {
            config,
            current: RwLock::new(None),
            status,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Replace the index with one built from `stops`
    ///
    /// On failure the previous index (if any) stays in service.
    pub fn rebuild(&self, stops: Vec<StopRecord>) -> CoreResult<IndexStatus> {
        let index = match StopIndex::build(stops) {
            Ok(index) => Arc::new(index),
            Err(e) => {
                warn!(error = %e, "stop index rebuild rejected, keeping previous index");
                return Err(e.into());
            }
        };
        let stop_count = index.len();

        let mut current = self.current.write();
        *current = Some(index);

        let mut published = IndexStatus::default();
        self.status.send_modify(|status| {
            status.generation += 1;
            status.stop_count = stop_count;
            status.built_at = Some(Utc::now());
            published = status.clone();
        });
        drop(current);

        info!(
            generation = published.generation,
            stops = stop_count,
            "stop index rebuilt"
        );
        Ok(published)
    }

    /// Load a fresh snapshot from `source` and rebuild
    pub fn reload(&self, source: &dyn StopSource) -> CoreResult<IndexStatus> {
        info!(source = %source.describe(), "reloading stops");
        let stops = source.load_stops()?;
        self.rebuild(stops)
    }

    /// The current index
    ///
    /// Fails with [`TransitError::IndexNotBuilt`] until the first successful
    /// rebuild, so callers can tell "not ready" apart from "no stops nearby".
    pub fn snapshot(&self) -> CoreResult<Arc<StopIndex>> {
        self.current
            .read()
            .clone()
            .ok_or_else(|| TransitError::IndexNotBuilt.into())
    }

    pub fn status(&self) -> IndexStatus {
        self.status.borrow().clone()
    }

    /// Watch for rebuilds
    pub fn subscribe(&self) -> watch::Receiver<IndexStatus> {
        self.status.subscribe()
    }

    pub fn query(&self, center: Point, radius_m: f64) -> CoreResult<Vec<StopMatch>> {
        Ok(self.snapshot()?.query(center, radius_m)?)
    }

    /// Stops within the configured nearby radius
    pub fn nearby(&self, center: Point) -> CoreResult<Vec<StopMatch>> {
        self.query(center, self.config.nearby_radius_m)
    }

    pub fn nearest(&self, center: Point, n: usize) -> CoreResult<Vec<StopMatch>> {
        Ok(self.snapshot()?.nearest(center, n)?)
    }

    /// Nearest stops, as many as the configured listing length
    pub fn nearest_default(&self, center: Point) -> CoreResult<Vec<StopMatch>> {
        self.nearest(center, self.config.nearest_count)
    }

    pub fn region(&self, region: Rect) -> CoreResult<Vec<StopMatch>> {
        Ok(self.snapshot()?.query_region(region)?)
    }

    pub fn stop(&self, number: &str) -> CoreResult<Arc<StopRecord>> {
        self.snapshot()?
            .get(number)
            .ok_or_else(|| TransitError::StopNotFound(StopNumber::new(number)).into())
    }

    /// The configured favourites ordered by walking time from `center`
    pub fn favourites(&self, center: Point) -> CoreResult<Vec<FavouriteEta>> {
        let index = self.snapshot()?;
        let favourites = FavouriteStops::from_numbers(&self.config.favourite_stops);
        favourites.by_walk_time(&index, center, self.config.walking_speed_mps)
    }
}

impl Default for StopIndexService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}
