//! Session configuration loaded from a JSON file

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DataError;

/// Locations of the four tabular sources, ingested in this order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPaths {
    pub canada_wildfires: PathBuf,
    pub america_wildfires: PathBuf,
    pub carbon_emissions: PathBuf,
    pub temperature_deviation: PathBuf,
}

/// Playback pacing parameters.
///
/// `day_increment` is days per logical step; `base_interval_ms` and the
/// speed multiplier control wall-clock pacing. Keeping them separate lets
/// the playback rate change without touching the cursor logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub day_increment: i64,
    pub window_length_days: i64,
    pub base_interval_ms: f64,
    pub speed: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            day_increment: 1,
            window_length_days: 7,
            base_interval_ms: 10.0,
            speed: 1.0,
        }
    }
}

/// Top-level config for one run: where the data lives and how playback is
/// paced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub datasets: DatasetPaths,
    #[serde(default)]
    pub player: PlayerSettings,
}

impl SessionConfig {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|e| DataError::io(&source_name, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| DataError::Config {
            source_name,
            cause: e,
        })
    }
}
