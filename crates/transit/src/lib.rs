//! # bus-assistant-transit
//!
//! Stop data and nearest-stop lookup for Christchurch Metro.
//!
//! ## Features
//!
//! - **Planar projection**: stop coordinates flattened against the stop set's
//!   bounding extent
//! - **Spatial queries**: R-tree radius, nearest-N, and map-region lookups with
//!   exact Haversine distances
//! - **Pluggable sources**: implement [`StopSource`] to supply stop snapshots
//!
//! ## Example
//!
//! ```
//! use bus_assistant_transit::prelude::*;
//! use geo::Point;
//!
//! let stops = vec![
//!     StopRecord::new("20763", "BusXchange_A", "Bus Interchange", "Lichfield St", Point::new(172.6367, -43.5347)),
//!     StopRecord::new("16385", "CathSq_B", "Cathedral Square", "Colombo St", Point::new(172.6366, -43.5309)),
//! ];
//!
//! let index = StopIndex::build(stops).unwrap();
//!
//! // Stops within 500m of the Bus Interchange, closest first
//! let nearby = index.query(Point::new(172.6367, -43.5347), 500.0).unwrap();
//! assert_eq!(nearby.len(), 2);
//! assert_eq!(nearby[0].stop.number.as_str(), "20763");
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::provider::static_provider::StaticStopSource;
    pub use crate::spatial::{haversine_distance, BoundingExtent, PlanarPoint, StopIndex};
}

pub use prelude::*;
