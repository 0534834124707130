//! Temperature deviation source adapter
//!
//! Layout: 4 preamble lines plus 1 header line, then one `(year, value)`
//! row per year. Every row is kept.

use std::collections::BTreeMap;
use std::io::BufRead;

use csv::ReaderBuilder;
use tracing::debug;

use super::{field, parse_number, skip_preamble};
use crate::records::TemperatureRecord;
use crate::DataError;

const PREAMBLE_LINES: usize = 4;

/// Read the temperature deviation series, inserting one
/// [`TemperatureRecord`] per row into `temperatures`. Returns the number of
/// records produced.
pub fn load<R: BufRead>(
    mut reader: R,
    source_name: &str,
    temperatures: &mut BTreeMap<i32, TemperatureRecord>,
) -> Result<usize, DataError> {
    // Preamble plus the header line; neither carries data.
    skip_preamble(&mut reader, PREAMBLE_LINES + 1, source_name)?;

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut loaded = 0usize;

    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| DataError::csv(source_name, e))?;

        let year: i32 = parse_number(field(&record, 0, row, source_name)?, "year", row, source_name)?;
        let deviation: f64 = parse_number(field(&record, 1, row, source_name)?, "deviation", row, source_name)?;

        temperatures.insert(year, TemperatureRecord { deviation, year });
        loaded += 1;
    }

    debug!(source = source_name, loaded, "temperature source read");
    Ok(loaded)
}
