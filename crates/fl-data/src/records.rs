//! Canonical record types produced by the source adapters

use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Years covered by the carbon emission source.
pub const EMISSION_YEARS: RangeInclusive<i32> = 1960..=2016;

/// Years covered by the temperature deviation source.
pub const TEMPERATURE_YEARS: RangeInclusive<i32> = 1910..=2020;

/// Wildfire rows dated before this are dropped at ingestion as
/// low-confidence.
pub fn earliest_allowed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1950, 1, 1).expect("valid constant date")
}

/// Country a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Canada,
    America,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Canada => "Canada",
            Country::America => "America",
        }
    }

    /// Name used by the carbon emission source, which says "United States"
    /// where the rest of the system says "America".
    pub fn emission_source_name(&self) -> &'static str {
        match self {
            Country::Canada => "Canada",
            Country::America => "United States",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single wildfire occurrence. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct WildfireEvent {
    pub country: Country,
    /// Degrees, in [-90, 90]
    pub latitude: f64,
    /// Degrees, in [-180, 180]
    pub longitude: f64,
    pub date: NaiveDate,
}

/// Annual carbon emissions for one country, in kilotons.
/// Two records exist per year, one per country.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRecord {
    pub country: Country,
    pub kilotons: f64,
    pub year: i32,
}

/// Annual global temperature deviation in signed degrees Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRecord {
    pub deviation: f64,
    pub year: i32,
}
