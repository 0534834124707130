//! Canadian wildfire source adapter
//!
//! The source stores the fire date as separate `YEAR`, `MONTH`, `DAY`
//! columns and uses zero as its sentinel for an unknown component.

use std::io::BufRead;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use super::{column_index, field, parse_number};
use crate::records::{earliest_allowed_date, Country, WildfireEvent};
use crate::store::EventMap;
use crate::DataError;

/// Read Canadian wildfire rows, appending one [`WildfireEvent`] per dated
/// row into `events`. Returns the number of events produced.
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

    let year_index = column_index(&headers, "YEAR", source_name)?;
    let month_index = column_index(&headers, "MONTH", source_name)?;
    let day_index = column_index(&headers, "DAY", source_name)?;
    let latitude_index = column_index(&headers, "LATITUDE", source_name)?;
    let longitude_index = column_index(&headers, "LONGITUDE", source_name)?;

    let cutoff = earliest_allowed_date();
    let mut loaded = 0usize;
    let mut skipped_sentinel = 0usize;
    let mut dropped_early = 0usize;

    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| DataError::csv(source_name, e))?;

        let year = date_component(field(&record, year_index, row, source_name)?, "YEAR", row, source_name)?;
        let month = date_component(field(&record, month_index, row, source_name)?, "MONTH", row, source_name)?;
        let day = date_component(field(&record, day_index, row, source_name)?, "DAY", row, source_name)?;

        // Zero means "unknown" in this source; such rows carry no usable
        // date and are skipped, not treated as errors.
        if year == 0 || month == 0 || day == 0 {
            skipped_sentinel += 1;
            continue;
        }

        let date = NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(|| {
            DataError::parse(
                source_name,
                row,
                format!("invalid calendar date {}-{}-{}", year, month, day),
            )
        })?;

        if date < cutoff {
            dropped_early += 1;
            continue;
        }

        let latitude: f64 = parse_number(field(&record, latitude_index, row, source_name)?, "LATITUDE", row, source_name)?;
        let longitude: f64 = parse_number(field(&record, longitude_index, row, source_name)?, "LONGITUDE", row, source_name)?;

        events.entry(date).or_default().push(WildfireEvent {
            country: Country::Canada,
            latitude,
            longitude,
            date,
        });
        loaded += 1;
    }

    debug!(
        source = source_name,
        loaded, skipped_sentinel, dropped_early, "canadian wildfire source read"
    );
    Ok(loaded)
}

/// A date component. Empty fields count as the zero sentinel; anything
/// else must be numeric.
fn date_component(raw: &str, what: &str, row: usize, source_name: &str) -> Result<i32, DataError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    parse_number(trimmed, what, row, source_name)
}
