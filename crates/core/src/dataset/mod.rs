//! Stop dataset sources.

pub mod json;

pub use json::{JsonStopSource, parse_stops};
