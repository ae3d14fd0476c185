//! Service configuration.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```toml
//! nearby_radius_m = 500.0
//! nearest_count = 5
//! walking_speed_mps = 1.4
//! stop_file = "stop_information.json"
//! favourite_stops = ["20763", "16385"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_NEARBY_RADIUS_M: f64 = 500.0;
pub const DEFAULT_NEAREST_COUNT: usize = 5;
/// Typical adult walking pace
pub const DEFAULT_WALKING_SPEED_MPS: f64 = 1.4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Radius used by "stops near me"
    pub nearby_radius_m: f64,
    /// Default length of nearest-stop listings
    pub nearest_count: usize,
    /// Pace used to turn distances into walk times
    pub walking_speed_mps: f64,
    /// JSON stop dataset loaded at start-up
    pub stop_file: Option<PathBuf>,
    /// Saved favourite stop numbers, in the rider's order
    pub favourite_stops: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            nearby_radius_m: DEFAULT_NEARBY_RADIUS_M,
            nearest_count: DEFAULT_NEAREST_COUNT,
            walking_speed_mps: DEFAULT_WALKING_SPEED_MPS,
            stop_file: None,
            favourite_stops: Vec::new(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file
    ///
    /// A relative `stop_file` is resolved against the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        let resolved = match (&config.stop_file, path.parent()) {
            (Some(stop_file), Some(dir)) if stop_file.is_relative() => Some(dir.join(stop_file)),
            _ => None,
        };
        if resolved.is_some() {
            config.stop_file = resolved;
        }

        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.nearby_radius_m.is_finite() && self.nearby_radius_m > 0.0) {
            return Err(CoreError::Config(format!(
                "nearby_radius_m must be positive, got {}",
                self.nearby_radius_m
            )));
        }

        if !(self.walking_speed_mps.is_finite() && self.walking_speed_mps > 0.0) {
            return Err(CoreError::Config(format!(
                "walking_speed_mps must be positive, got {}",
                self.walking_speed_mps
            )));
        }

        Ok(())
    }
}
