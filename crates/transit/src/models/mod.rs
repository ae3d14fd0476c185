//! Stop data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::StopSource;
pub use types::{BusLine, OrbiterDirection, Result, StopMatch, StopRecord, TransitError};
