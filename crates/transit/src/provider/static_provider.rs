//! In-memory stop source.
//!
//! Holds a fixed snapshot, typically stops compiled into the app bundle or
//! built by tests.

use crate::models::{traits::StopSource, types::*};

#[derive(Clone, Debug, Default)]
pub struct StaticStopSource {
    stops: Vec<StopRecord>,
}

impl StaticStopSource {
    pub fn new(stops: Vec<StopRecord>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl From<Vec<StopRecord>> for StaticStopSource {
    fn from(stops: Vec<StopRecord>) -> Self {
        Self::new(stops)
    }
}

impl StopSource for StaticStopSource {
    fn load_stops(&self) -> Result<Vec<StopRecord>> {
        Ok(self.stops.clone())
    }

    fn describe(&self) -> String {
        format!("static source ({} stops)", self.stops.len())
    }
}
