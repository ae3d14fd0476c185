//! Stop dataset in the app's `stop_information.json` format.
//!
//! The file is one object keyed by stop number:
//!
//! ```json
//! {
//!   "20763": {
//!     "name": "Bus Interchange",
//!     "stop_tag": "BusXchange_A",
//!     "road_name": "Lichfield St",
//!     "latitude": "-43.5347",
//!     "longitude": "172.6367",
//!     "lines": ["P", "Oc", "28"]
//!   }
//! }
//! ```
//!
//! Coordinates appear both as JSON numbers and as numeric strings in
//! published datasets; both are accepted. A stop number that appears twice
//! is rejected rather than letting the later entry win.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};

use geo::Point;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::transit::{BusLine, StopNumber, StopRecord, StopSource, TransitError};

/// Top-level document entries in file order, repeated keys included
struct StopDocument(Vec<(String, RawStop)>);

impl<'de> Deserialize<'de> for StopDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = StopDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by stop number")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RawStop>()? {
                    entries.push(entry);
                }
                Ok(StopDocument(entries))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct RawStop {
    name: String,
    stop_tag: String,
    #[serde(default)]
    road_name: String,
    latitude: RawCoordinate,
    longitude: RawCoordinate,
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    fn value(&self, stop: &str, field: &str) -> CoreResult<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                CoreError::Transit(TransitError::InvalidData(format!(
                    "stop {stop}: {field} {text:?} is not a number"
                )))
            }),
        }
    }
}

/// Parse a stop dataset document into records, ordered by stop number
pub fn parse_stops(json: &str) -> CoreResult<Vec<StopRecord>> {
    let StopDocument(entries) = serde_json::from_str(json)?;

    let mut raw = BTreeMap::new();
    for (number, stop) in entries {
        match raw.entry(number) {
            Entry::Occupied(existing) => {
                return Err(TransitError::DuplicateStopNumber(StopNumber::new(existing.key())).into());
            }
            Entry::Vacant(slot) => {
                slot.insert(stop);
            }
        }
    }

    raw.into_iter()
        .map(|(number, stop)| {
            let latitude = stop.latitude.value(&number, "latitude")?;
            let longitude = stop.longitude.value(&number, "longitude")?;
            let lines = stop.lines.iter().map(|line| BusLine::parse(line)).collect();

            Ok(StopRecord::new(
                number.as_str(),
                stop.stop_tag,
                stop.name,
                stop.road_name,
                Point::new(longitude, latitude),
            )
            .with_lines(lines))
        })
        .collect()
}

/// A [`StopSource`] reading a JSON dataset file on every load
#[derive(Clone, Debug)]
pub struct JsonStopSource {
    path: PathBuf,
}

impl JsonStopSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StopSource for JsonStopSource {
    fn load_stops(&self) -> Result<Vec<StopRecord>, TransitError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            TransitError::SourceUnavailable(format!("{}: {e}", self.path.display()))
        })?;

        let stops = parse_stops(&json).map_err(|e| match e {
            CoreError::Transit(inner) => inner,
            other => TransitError::InvalidData(format!("{}: {other}", self.path.display())),
        })?;

        debug!(path = %self.path.display(), stops = stops.len(), "loaded stop dataset");
        Ok(stops)
    }

    fn describe(&self) -> String {
        format!("JSON dataset {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit::OrbiterDirection;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "20763": {
            "name": "Bus Interchange",
            "stop_tag": "BusXchange_A",
            "road_name": "Lichfield St",
            "latitude": "-43.5347",
            "longitude": "172.6367",
            "lines": ["P", "Oc", "28"]
        },
        "16385": {
            "name": "Cathedral Square",
            "stop_tag": "CathSq_B",
            "road_name": "Colombo St",
            "latitude": -43.5309,
            "longitude": 172.6366,
            "lines": []
        }
    }"#;

    #[test]
    fn test_parse_stops() {
        let stops = parse_stops(SAMPLE).unwrap();
        assert_eq!(stops.len(), 2);

        // Ordered by stop number
        assert_eq!(stops[0].number.as_str(), "16385");
        assert_eq!(stops[1].number.as_str(), "20763");

        let interchange = &stops[1];
        assert_eq!(interchange.tag.as_str(), "BusXchange_A");
        assert_eq!(&*interchange.road_name, "Lichfield St");
        assert_eq!(interchange.latitude(), -43.5347);
        assert_eq!(interchange.longitude(), 172.6367);
        assert_eq!(
            interchange.lines,
            vec![
                BusLine::Purple,
                BusLine::Orbiter(OrbiterDirection::Clockwise),
                BusLine::Numbered("28".into()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_coordinate() {
        let json = r#"{"1": {"name": "x", "stop_tag": "t", "latitude": "north", "longitude": 172.6}}"#;
        let result = parse_stops(json);
        assert!(matches!(
            result,
            Err(CoreError::Transit(TransitError::InvalidData(_)))
        ));
    }

    #[test]
    fn test_parse_rejects_repeated_stop_number() {
        let json = r#"{
            "1": {"name": "a", "stop_tag": "t1", "latitude": -43.53, "longitude": 172.63},
            "1": {"name": "b", "stop_tag": "t2", "latitude": -43.54, "longitude": 172.64}
        }"#;

        match parse_stops(json) {
            Err(CoreError::Transit(TransitError::DuplicateStopNumber(number))) => {
                assert_eq!(number.as_str(), "1");
            }
            other => panic!("expected duplicate stop error, got {other:?}"),
        }
    }

    #[test]
    fn test_json_source_rejects_repeated_stop_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"7": {"name": "a", "stop_tag": "t", "latitude": 0, "longitude": 0},
                "7": {"name": "a", "stop_tag": "t", "latitude": 0, "longitude": 0}}"#,
        )
        .unwrap();

        assert!(matches!(
            JsonStopSource::new(file.path()).load_stops(),
            Err(TransitError::DuplicateStopNumber(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(parse_stops("[1, 2"), Err(CoreError::Json(_))));
    }

    #[test]
    fn test_json_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = JsonStopSource::new(file.path());
        let stops = source.load_stops().unwrap();
        assert_eq!(stops.len(), 2);
        assert!(source.describe().starts_with("JSON dataset"));
    }

    #[test]
    fn test_json_source_missing_file() {
        let source = JsonStopSource::new("/no/such/stop_information.json");
        assert!(matches!(
            source.load_stops(),
            Err(TransitError::SourceUnavailable(_))
        ));
    }
}
