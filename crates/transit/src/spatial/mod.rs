//! Spatial indexing and query utilities.

pub mod index;
pub mod projection;
pub mod queries;
pub mod stop_index;

pub use projection::{BoundingExtent, PlanarPoint};
pub use queries::haversine_distance;
pub use stop_index::StopIndex;
