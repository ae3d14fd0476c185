//! Core traits for stop data.
//!
//! A [`StopSource`] hands the index a complete snapshot of every stop.
//! Implementations can be in-memory, file-backed, or remote.

use crate::models::types::*;

/// Supplier of the full stop set
///
/// Every call returns a complete, consistent snapshot: no partial records,
/// every record carrying a coordinate. The index is rebuilt wholesale from
/// whatever the source returns.
pub trait StopSource: Send + Sync {
    fn load_stops(&self) -> Result<Vec<StopRecord>>;

    /// Short description used in log output
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}
