//! Export adapters, the mirror of ingestion
//!
//! Each writer regenerates a file in the same tabular schema its source
//! adapter consumes, minus the redundant columns of the original raw data.
//! Exporting and reingesting wildfire data yields the identical event set;
//! sentinel-dated rows were dropped at ingestion and cannot reappear.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Datelike;
use csv::Writer;
use tracing::info;

use crate::records::{Country, EMISSION_YEARS};
use crate::store::DataStore;
use crate::DataError;

const PREAMBLE_LINES: usize = 4;

/// Write the Canadian wildfire mirror file:
/// `YEAR,MONTH,DAY,LATITUDE,LONGITUDE`.
pub fn write_canada_wildfires<W: Write>(store: &DataStore, writer: W) -> Result<(), DataError> {
    let source_name = "canada wildfire export";
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer
        .write_record(["YEAR", "MONTH", "DAY", "LATITUDE", "LONGITUDE"])
        .map_err(|e| DataError::csv(source_name, e))?;

    for event in store.events().filter(|e| e.country == Country::Canada) {
        csv_writer
            .write_record([
                event.date.year().to_string(),
                event.date.month().to_string(),
                event.date.day().to_string(),
                event.latitude.to_string(),
                event.longitude.to_string(),
            ])
            .map_err(|e| DataError::csv(source_name, e))?;
    }
    csv_writer
        .flush()
        .map_err(|e| DataError::io(source_name, e))
}

/// Write the American wildfire mirror file:
/// `DISCOVERY_DATE,LATITUDE,LONGITUDE` with the date as unpadded `YYYY-M-D`.
pub fn write_america_wildfires<W: Write>(store: &DataStore, writer: W) -> Result<(), DataError> {
    let source_name = "america wildfire export";
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer
        .write_record(["DISCOVERY_DATE", "LATITUDE", "LONGITUDE"])
        .map_err(|e| DataError::csv(source_name, e))?;

    for event in store.events().filter(|e| e.country == Country::America) {
        let date = format!(
            "{}-{}-{}",
            event.date.year(),
            event.date.month(),
            event.date.day()
        );
        csv_writer
            .write_record([
                date,
                event.latitude.to_string(),
                event.longitude.to_string(),
            ])
            .map_err(|e| DataError::csv(source_name, e))?;
    }
    csv_writer
        .flush()
        .map_err(|e| DataError::io(source_name, e))
}

/// Write the emission mirror file: 4 blank preamble lines, a header of
/// `Country Name` plus one column per year, then a row per country with
/// the source's own country naming restored.
pub fn write_carbon_emissions<W: Write>(store: &DataStore, mut writer: W) -> Result<(), DataError> {
    let source_name = "carbon emission export";
    write_blank_preamble(&mut writer, source_name)?;

    let mut csv_writer = Writer::from_writer(writer);
    let mut header = vec!["Country Name".to_string()];
    header.extend(EMISSION_YEARS.map(|year| year.to_string()));
    csv_writer
        .write_record(&header)
        .map_err(|e| DataError::csv(source_name, e))?;

    for country in [Country::Canada, Country::America] {
        let mut row = vec![country.emission_source_name().to_string()];
        for year in EMISSION_YEARS {
            row.push(store.emissions_for_year(year, country)?.to_string());
        }
        csv_writer
            .write_record(&row)
            .map_err(|e| DataError::csv(source_name, e))?;
    }
    csv_writer
        .flush()
        .map_err(|e| DataError::io(source_name, e))
}

/// Write the temperature mirror file: 4 blank preamble lines, a
/// `Year,Value` header, then one row per year ascending.
pub fn write_temperature_deviation<W: Write>(
    store: &DataStore,
    mut writer: W,
) -> Result<(), DataError> {
    let source_name = "temperature deviation export";
    write_blank_preamble(&mut writer, source_name)?;

    let mut csv_writer = Writer::from_writer(writer);
    csv_writer
        .write_record(["Year", "Value"])
        .map_err(|e| DataError::csv(source_name, e))?;

    for record in store.temperature_by_year.values() {
        csv_writer
            .write_record([record.year.to_string(), record.deviation.to_string()])
            .map_err(|e| DataError::csv(source_name, e))?;
    }
    csv_writer
        .flush()
        .map_err(|e| DataError::io(source_name, e))
}

/// Export all four mirror files into `dir`, using the same file names the
/// ingestion side is normally configured with.
pub fn export_all(store: &DataStore, dir: &Path) -> Result<(), DataError> {
    write_canada_wildfires(store, create_file(&dir.join("canada_wildfire_data.csv"))?)?;
    write_america_wildfires(store, create_file(&dir.join("america_wildfire_data.csv"))?)?;
    write_carbon_emissions(store, create_file(&dir.join("carbon_data.csv"))?)?;
    write_temperature_deviation(
        store,
        create_file(&dir.join("temperature_deviance_data.csv"))?,
    )?;
    info!(dir = %dir.display(), "exported cleaned datasets");
    Ok(())
}

/// The original raw files carry 4 blank lines before the header; the
/// mirror files reproduce them.
fn write_blank_preamble<W: Write>(writer: &mut W, source_name: &str) -> Result<(), DataError> {
    for _ in 0..PREAMBLE_LINES {
        writer
            .write_all(b"\n")
            .map_err(|e| DataError::io(source_name, e))?;
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>, DataError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| DataError::io(&path.display().to_string(), e))
}
