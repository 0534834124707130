//! Data ingestion, storage and export for the wildfire timelapse

pub mod adapters;
pub mod config;
pub mod export;
pub mod records;
pub mod store;

use thiserror::Error;

// Re-exports
pub use config::{DatasetPaths, PlayerSettings, SessionConfig};
pub use records::{Country, EmissionRecord, TemperatureRecord, WildfireEvent};
pub use store::{DataStore, DataStoreBuilder};

/// Errors that can occur in data operations.
///
/// Ingestion errors always carry the name of the offending source. There is
/// no partial-success mode: any fatal error aborts the whole ingestion.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{source_name}: I/O error: {cause}")]
    Io {
        source_name: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("{source_name}: CSV error: {cause}")]
    Csv {
        source_name: String,
        #[source]
        cause: csv::Error,
    },

    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("{source_name}: row {row}: {detail}")]
    Parse {
        source_name: String,
        row: usize,
        detail: String,
    },

    #[error("{source_name}: invalid config: {cause}")]
    Config {
        source_name: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("dataset contains no wildfire events")]
    EmptyDataset,

    #[error("no {what} record for {key}")]
    NotFound { what: &'static str, key: String },
}

impl DataError {
    pub(crate) fn io(source_name: &str, cause: std::io::Error) -> Self {
        DataError::Io {
            source_name: source_name.to_string(),
            cause,
        }
    }

    pub(crate) fn csv(source_name: &str, cause: csv::Error) -> Self {
        DataError::Csv {
            source_name: source_name.to_string(),
            cause,
        }
    }

    pub(crate) fn parse(source_name: &str, row: usize, detail: impl Into<String>) -> Self {
        DataError::Parse {
            source_name: source_name.to_string(),
            row,
            detail: detail.into(),
        }
    }
}
