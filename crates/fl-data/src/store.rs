//! Date-indexed in-memory store built once at startup
//!
//! Construction runs the four source adapters in a fixed sequential order:
//! Canadian wildfires, American wildfires (both append into the same event
//! map, so this ordering is load-bearing), emissions, temperature. Any
//! adapter failure aborts the whole construction; callers never see a
//! partially populated store. Once built the store is read-only and may be
//! shared freely behind an `Arc`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::adapters;
use crate::config::DatasetPaths;
use crate::records::{
    Country, EmissionRecord, TemperatureRecord, WildfireEvent, EMISSION_YEARS, TEMPERATURE_YEARS,
};
use crate::DataError;

/// Events keyed by exact calendar date, insertion order within a date.
pub type EventMap = BTreeMap<NaiveDate, Vec<WildfireEvent>>;

/// Accumulates adapter output; [`finish`](DataStoreBuilder::finish) checks
/// the non-emptiness invariant and seals the result.
#[derive(Default)]
pub struct DataStoreBuilder {
    events_by_date: EventMap,
    emissions_by_year: BTreeMap<i32, Vec<EmissionRecord>>,
    temperature_by_year: BTreeMap<i32, TemperatureRecord>,
}

impl DataStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest_canada_wildfires<R: BufRead>(
        &mut self,
        reader: R,
        source_name: &str,
    ) -> Result<usize, DataError> {
        adapters::canada::load(reader, source_name, &mut self.events_by_date)
    }

    pub fn ingest_america_wildfires<R: BufRead>(
        &mut self,
        reader: R,
        source_name: &str,
    ) -> Result<usize, DataError> {
        adapters::america::load(reader, source_name, &mut self.events_by_date)
    }

    pub fn ingest_carbon_emissions<R: BufRead>(
        &mut self,
        reader: R,
        source_name: &str,
    ) -> Result<usize, DataError> {
        adapters::emissions::load(reader, source_name, &mut self.emissions_by_year)
    }

    pub fn ingest_temperature_deviation<R: BufRead>(
        &mut self,
        reader: R,
        source_name: &str,
    ) -> Result<usize, DataError> {
        adapters::temperature::load(reader, source_name, &mut self.temperature_by_year)
    }

    /// Seal the builder. Fails with [`DataError::EmptyDataset`] if no
    /// wildfire event survived ingestion.
    pub fn finish(self) -> Result<DataStore, DataError> {
        if self.events_by_date.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        Ok(DataStore {
            events_by_date: self.events_by_date,
            emissions_by_year: self.emissions_by_year,
            temperature_by_year: self.temperature_by_year,
        })
    }
}

/// The canonical dataset: wildfire events by date, emission records by
/// year, temperature records by year. Immutable after construction.
pub struct DataStore {
    pub(crate) events_by_date: EventMap,
    pub(crate) emissions_by_year: BTreeMap<i32, Vec<EmissionRecord>>,
    pub(crate) temperature_by_year: BTreeMap<i32, TemperatureRecord>,
}

impl DataStore {
    /// Build the store from the four configured source files, running the
    /// adapters in the fixed ingestion order.
    pub fn load(paths: &DatasetPaths) -> Result<Self, DataError> {
        let mut builder = DataStoreBuilder::new();

        let name = paths.canada_wildfires.display().to_string();
        let loaded = builder.ingest_canada_wildfires(open_source(&paths.canada_wildfires)?, &name)?;
        info!(source = %name, events = loaded, "loaded canadian wildfires");

        let name = paths.america_wildfires.display().to_string();
        let loaded = builder.ingest_america_wildfires(open_source(&paths.america_wildfires)?, &name)?;
        info!(source = %name, events = loaded, "loaded american wildfires");

        let name = paths.carbon_emissions.display().to_string();
        let loaded = builder.ingest_carbon_emissions(open_source(&paths.carbon_emissions)?, &name)?;
        info!(source = %name, records = loaded, "loaded carbon emissions");

        let name = paths.temperature_deviation.display().to_string();
        let loaded =
            builder.ingest_temperature_deviation(open_source(&paths.temperature_deviation)?, &name)?;
        info!(source = %name, records = loaded, "loaded temperature deviations");

        builder.finish()
    }

    /// Events on an exact date; empty slice if none, never an error.
    pub fn events_on(&self, date: NaiveDate) -> &[WildfireEvent] {
        self.events_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Events with date in `[start, end]`, inclusive. Ingestion order
    /// within a date, date order across dates.
    pub fn events_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&WildfireEvent> {
        self.events_by_date
            .range(start..=end)
            .flat_map(|(_, fires)| fires.iter())
            .collect()
    }

    /// All events, in date order.
    pub fn events(&self) -> impl Iterator<Item = &WildfireEvent> + '_ {
        self.events_by_date.values().flat_map(|fires| fires.iter())
    }

    pub fn earliest_date(&self) -> Result<NaiveDate, DataError> {
        self.events_by_date
            .keys()
            .next()
            .copied()
            .ok_or(DataError::EmptyDataset)
    }

    pub fn latest_date(&self) -> Result<NaiveDate, DataError> {
        self.events_by_date
            .keys()
            .next_back()
            .copied()
            .ok_or(DataError::EmptyDataset)
    }

    /// Emission amount in kilotons for one country and year.
    pub fn emissions_for_year(&self, year: i32, country: Country) -> Result<f64, DataError> {
        if !EMISSION_YEARS.contains(&year) {
            return Err(not_found("emission", year, Some(country)));
        }
        self.emissions_by_year
            .get(&year)
            .and_then(|records| records.iter().find(|r| r.country == country))
            .map(|r| r.kilotons)
            .ok_or_else(|| not_found("emission", year, Some(country)))
    }

    /// Temperature deviation in degrees Celsius for one year.
    pub fn temperature_for_year(&self, year: i32) -> Result<f64, DataError> {
        if !TEMPERATURE_YEARS.contains(&year) {
            return Err(not_found("temperature", year, None));
        }
        self.temperature_by_year
            .get(&year)
            .map(|r| r.deviation)
            .ok_or_else(|| not_found("temperature", year, None))
    }

    pub fn event_count(&self) -> usize {
        self.events_by_date.values().map(Vec::len).sum()
    }

    pub fn date_count(&self) -> usize {
        self.events_by_date.len()
    }
}

fn not_found(what: &'static str, year: i32, country: Option<Country>) -> DataError {
    DataError::NotFound {
        what,
        key: match country {
            Some(country) => format!("{} {}", country, year),
            None => year.to_string(),
        },
    }
}

fn open_source(path: &Path) -> Result<BufReader<File>, DataError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| DataError::io(&path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CANADA: &str = "\
YEAR,MONTH,DAY,LATITUDE,LONGITUDE
2000,6,15,49.5,-123.1
2000,6,15,50.0,-120.0
2000,6,0,50.0,-120.0
2003,8,1,60.1,-110.9
";

    const AMERICA: &str = "\
DISCOVERY_DATE,LATITUDE,LONGITUDE
2000-06-15,34.0,-118.0
2001-07-04,40.0,-105.0
";

    const TEMPERATURE: &str = "\n\n\n\nYear,Value\n2000,0.42\n2001,0.55\n";

    fn emission_source() -> String {
        let years: Vec<String> = EMISSION_YEARS.map(|y| y.to_string()).collect();
        let mut out = String::from("\n\n\n\n");
        out.push_str("Country Name,");
        out.push_str(&years.join(","));
        out.push('\n');
        for country in ["Canada", "United States"] {
            out.push_str(country);
            for year in EMISSION_YEARS {
                out.push_str(&format!(",{}.0", year - 1900));
            }
            out.push('\n');
        }
        out
    }

    fn sample_store() -> DataStore {
        let mut builder = DataStoreBuilder::new();
        builder
            .ingest_canada_wildfires(Cursor::new(CANADA), "canada.csv")
            .unwrap();
        builder
            .ingest_america_wildfires(Cursor::new(AMERICA), "america.csv")
            .unwrap();
        builder
            .ingest_carbon_emissions(Cursor::new(emission_source()), "carbon.csv")
            .unwrap();
        builder
            .ingest_temperature_deviation(Cursor::new(TEMPERATURE), "temperature.csv")
            .unwrap();
        builder.finish().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_store_invariants() {
        let store = sample_store();
        assert_eq!(store.event_count(), 5);
        for event in store.events() {
            assert!(matches!(event.country, Country::Canada | Country::America));
            assert!(event.date >= crate::records::earliest_allowed_date());
        }
        let earliest = store.earliest_date().unwrap();
        let latest = store.latest_date().unwrap();
        assert!(earliest <= latest);
        assert_eq!(earliest, date(2000, 6, 15));
        assert_eq!(latest, date(2003, 8, 1));
    }

    #[test]
    fn test_events_on_shared_date_keeps_ingestion_order() {
        let store = sample_store();
        // Two Canadian adapters rows first, then the American one: the two
        // wildfire adapters append sequentially into the same map.
        let fires = store.events_on(date(2000, 6, 15));
        assert_eq!(fires.len(), 3);
        assert_eq!(fires[0].country, Country::Canada);
        assert_eq!(fires[1].country, Country::Canada);
        assert_eq!(fires[2].country, Country::America);
    }

    #[test]
    fn test_events_on_missing_date_is_empty_not_error() {
        let store = sample_store();
        assert!(store.events_on(date(1999, 1, 1)).is_empty());
    }

    #[test]
    fn test_events_in_range_inclusive() {
        let store = sample_store();
        let events = store.events_in_range(date(2000, 6, 15), date(2001, 7, 4));
        assert_eq!(events.len(), 4);
        let events = store.events_in_range(date(2000, 6, 16), date(2001, 7, 3));
        assert!(events.is_empty());
    }

    #[test]
    fn test_emission_queries() {
        let store = sample_store();
        assert_eq!(
            store.emissions_for_year(1960, Country::Canada).unwrap(),
            60.0
        );
        assert_eq!(
            store.emissions_for_year(2016, Country::America).unwrap(),
            116.0
        );
        assert!(matches!(
            store.emissions_for_year(1959, Country::Canada),
            Err(DataError::NotFound { .. })
        ));
        assert!(matches!(
            store.emissions_for_year(2017, Country::America),
            Err(DataError::NotFound { .. })
        ));
    }

    #[test]
    fn test_temperature_queries() {
        let store = sample_store();
        assert_eq!(store.temperature_for_year(2000).unwrap(), 0.42);
        // In range but no record ingested
        assert!(matches!(
            store.temperature_for_year(1995),
            Err(DataError::NotFound { .. })
        ));
        // Outside the supported range
        assert!(matches!(
            store.temperature_for_year(1909),
            Err(DataError::NotFound { .. })
        ));
        assert!(matches!(
            store.temperature_for_year(2021),
            Err(DataError::NotFound { .. })
        ));
    }

    #[test]
    fn test_empty_store_fails_construction() {
        let builder = DataStoreBuilder::new();
        assert!(matches!(builder.finish(), Err(DataError::EmptyDataset)));
    }

    #[test]
    fn test_wildfires_alone_satisfy_construction() {
        let mut builder = DataStoreBuilder::new();
        builder
            .ingest_canada_wildfires(Cursor::new(CANADA), "canada.csv")
            .unwrap();
        assert!(builder.finish().is_ok());
    }
}
