//! American wildfire source adapter
//!
//! The source carries a single `DISCOVERY_DATE` column of the form
//! `YYYY-MM-DD`. Unlike the Canadian source there is no sentinel value: a
//! malformed date string is a fatal parse error, not a skip.

use std::io::BufRead;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use super::{column_index, field, parse_number};
use crate::records::{earliest_allowed_date, Country, WildfireEvent};
use crate::store::EventMap;
use crate::DataError;

/// Read American wildfire rows, appending one [`WildfireEvent`] per row
/// into `events`. Returns the number of events produced.
pub fn load<R: BufRead>(
    reader: R,
    source_name: &str,
    events: &mut EventMap,
) -> Result<usize, DataError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| DataError::csv(source_name, e))?
        .clone();

    let latitude_index = column_index(&headers, "LATITUDE", source_name)?;
    let longitude_index = column_index(&headers, "LONGITUDE", source_name)?;
    let date_index = column_index(&headers, "DISCOVERY_DATE", source_name)?;

    let cutoff = earliest_allowed_date();
    let mut loaded = 0usize;
    let mut dropped_early = 0usize;

    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| DataError::csv(source_name, e))?;

        let raw_date = field(&record, date_index, row, source_name)?;
        let date = parse_discovery_date(raw_date, row, source_name)?;

        if date < cutoff {
            dropped_early += 1;
            continue;
        }

        let latitude: f64 = parse_number(field(&record, latitude_index, row, source_name)?, "LATITUDE", row, source_name)?;
        let longitude: f64 = parse_number(field(&record, longitude_index, row, source_name)?, "LONGITUDE", row, source_name)?;

        events.entry(date).or_default().push(WildfireEvent {
            country: Country::America,
            latitude,
            longitude,
            date,
        });
        loaded += 1;
    }

    debug!(
        source = source_name,
        loaded, dropped_early, "american wildfire source read"
    );
    Ok(loaded)
}

/// Parse a `YYYY-MM-DD` discovery date. Wrong segment count, a non-numeric
/// segment, or an impossible calendar date are all fatal.
fn parse_discovery_date(raw: &str, row: usize, source_name: &str) -> Result<NaiveDate, DataError> {
    let segments: Vec<&str> = raw.trim().split('-').collect();
    if segments.len() != 3 {
        return Err(DataError::parse(
            source_name,
            row,
            format!("malformed discovery date '{}'", raw),
        ));
    }

    let year: i32 = parse_number(segments[0], "discovery year", row, source_name)?;
    let month: u32 = parse_number(segments[1], "discovery month", row, source_name)?;
    let day: u32 = parse_number(segments[2], "discovery day", row, source_name)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DataError::parse(
            source_name,
            row,
            format!("invalid calendar date '{}'", raw),
        )
    })
}
