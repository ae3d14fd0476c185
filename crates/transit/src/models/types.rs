//! Core data types and enums for stop data.

use std::fmt;
use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Direction of travel around the Orbiter loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrbiterDirection {
    Clockwise,
    AntiClockwise,
}

/// A bus line serving a stop
///
/// The four Metro "colour" lines and the Orbiter have dedicated variants;
/// every other route is carried by its route number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BusLine {
    Purple,
    Orange,
    Yellow,
    Blue,
    Orbiter(OrbiterDirection),
    Numbered(Arc<str>),
}

impl BusLine {
    /// Parse the abbreviation used by the stop dataset (`"P"`, `"Oc"`, `"28"`, ...)
    pub fn parse(abbreviation: &str) -> Self {
        match abbreviation {
            "P" => Self::Purple,
            "O" => Self::Orange,
            "Y" => Self::Yellow,
            "B" => Self::Blue,
            "Oa" => Self::Orbiter(OrbiterDirection::AntiClockwise),
            "Oc" => Self::Orbiter(OrbiterDirection::Clockwise),
            other => Self::Numbered(other.into()),
        }
    }
}

impl fmt::Display for BusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purple => f.write_str("P"),
            Self::Orange => f.write_str("O"),
            Self::Yellow => f.write_str("Y"),
            Self::Blue => f.write_str("B"),
            Self::Orbiter(OrbiterDirection::AntiClockwise) => f.write_str("Oa"),
            Self::Orbiter(OrbiterDirection::Clockwise) => f.write_str("Oc"),
            Self::Numbered(route) => f.write_str(route),
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// One physical bus stop
///
/// `location` follows the `geo` convention: x is longitude, y is latitude,
/// both in decimal degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct StopRecord {
    pub number: StopNumber,
    pub tag: StopTag,
    pub name: Arc<str>,
    pub road_name: Arc<str>,
    pub location: Point,
    pub lines: Vec<BusLine>,
}

impl StopRecord {
    pub fn new(
        number: impl Into<StopNumber>,
        tag: impl Into<StopTag>,
        name: impl AsRef<str>,
        road_name: impl AsRef<str>,
        location: Point,
    ) -> Self {
        Self {
            number: number.into(),
            tag: tag.into(),
            name: name.as_ref().into(),
            road_name: road_name.as_ref().into(),
            location,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: Vec<BusLine>) -> Self {
        self.lines = lines;
        self
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    /// Reject coordinates that cannot be projected
    pub fn validate(&self) -> Result<()> {
        let (lat, lon) = (self.latitude(), self.longitude());
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        if !valid {
            return Err(TransitError::InvalidCoordinate {
                stop: self.number.clone(),
                latitude: lat,
                longitude: lon,
            });
        }

        Ok(())
    }
}

/// A stop returned by a spatial query, with its great-circle distance in meters
#[derive(Clone, Debug, PartialEq)]
pub struct StopMatch {
    pub stop: Arc<StopRecord>,
    pub distance_m: f64,
}

impl StopMatch {
    pub fn new(stop: Arc<StopRecord>, distance_m: f64) -> Self {
        Self { stop, distance_m }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Cannot build a stop index from an empty stop set")]
    EmptyStopSet,

    #[error("Stop index has not been built")]
    IndexNotBuilt,

    #[error("Duplicate stop number: {0}")]
    DuplicateStopNumber(StopNumber),

    #[error("Stop not found: {0}")]
    StopNotFound(StopNumber),

    #[error("Invalid search radius: {0}")]
    InvalidRadius(f64),

    #[error("Stop {stop} has invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        stop: StopNumber,
        latitude: f64,
        longitude: f64,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Stop source unavailable: {0}")]
    SourceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
