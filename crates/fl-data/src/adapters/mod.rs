//! Source adapters translating external tabular sources into canonical
//! records.
//!
//! Each adapter reads one source through any [`BufRead`] handle and appends
//! into the collection handed to it by the [`DataStoreBuilder`]. Missing
//! required columns and unparsable numeric fields are fatal and abort the
//! whole ingestion; rows with a zero date component are skipped silently,
//! which is a documented tolerance of the wildfire sources, not an error.
//!
//! [`DataStoreBuilder`]: crate::store::DataStoreBuilder

pub mod america;
pub mod canada;
pub mod emissions;
pub mod temperature;

use std::io::BufRead;
use std::str::FromStr;

use csv::StringRecord;

use crate::DataError;

/// Locate a required column by header name. Column order is not
/// contractual, names are.
pub(crate) fn column_index(
    headers: &StringRecord,
    column: &str,
    source_name: &str,
) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| DataError::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        })
}

pub(crate) fn field<'a>(
    record: &'a StringRecord,
    index: usize,
    row: usize,
    source_name: &str,
) -> Result<&'a str, DataError> {
    record
        .get(index)
        .ok_or_else(|| DataError::parse(source_name, row, format!("missing field {}", index)))
}

pub(crate) fn parse_number<T: FromStr>(
    raw: &str,
    what: &str,
    row: usize,
    source_name: &str,
) -> Result<T, DataError> {
    raw.trim().parse::<T>().map_err(|_| {
        DataError::parse(source_name, row, format!("cannot parse {} from '{}'", what, raw))
    })
}

/// Consume fixed leading non-data lines before handing the stream to the
/// CSV reader.
pub(crate) fn skip_preamble<R: BufRead>(
    reader: &mut R,
    lines: usize,
    source_name: &str,
) -> Result<(), DataError> {
    let mut line = String::new();
    for _ in 0..lines {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| DataError::io(source_name, e))?;
        if read == 0 {
            return Err(DataError::parse(
                source_name,
                0,
                "unexpected end of file in preamble",
            ));
        }
    }
    Ok(())
}
