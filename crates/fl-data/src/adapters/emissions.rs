//! Carbon emission source adapter
//!
//! World Bank layout: 4 preamble lines, then a header with `Country Name`
//! and one column per calendar year labeled with the stringified year.
//! Only the Canada and United States rows are kept, and `United States` is
//! renamed to `America` to match the wildfire country tags.

use std::collections::BTreeMap;
use std::io::BufRead;

use csv::ReaderBuilder;
use tracing::debug;

use super::{column_index, field, parse_number, skip_preamble};
use crate::records::{Country, EmissionRecord, EMISSION_YEARS};
use crate::DataError;

const PREAMBLE_LINES: usize = 4;

/// Read the emission series, appending one [`EmissionRecord`] per
/// (country, year) pair into `emissions`. Returns the number of records
/// produced.
pub fn load<R: BufRead>(
    mut reader: R,
    source_name: &str,
    emissions: &mut BTreeMap<i32, Vec<EmissionRecord>>,
) -> Result<usize, DataError> {
    skip_preamble(&mut reader, PREAMBLE_LINES, source_name)?;

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| DataError::csv(source_name, e))?
        .clone();

    let country_index = column_index(&headers, "Country Name", source_name)?;
    let year_columns: Vec<(i32, usize)> = EMISSION_YEARS
        .map(|year| Ok((year, column_index(&headers, &year.to_string(), source_name)?)))
        .collect::<Result<_, DataError>>()?;

    let mut loaded = 0usize;

    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| DataError::csv(source_name, e))?;

        let country = match record.get(country_index) {
            Some("Canada") => Country::Canada,
            // Renamed to keep country tags consistent across sources
            Some("United States") => Country::America,
            _ => continue,
        };

        for &(year, column) in &year_columns {
            let kilotons: f64 = parse_number(
                field(&record, column, row, source_name)?,
                "emission amount",
                row,
                source_name,
            )?;
            emissions.entry(year).or_default().push(EmissionRecord {
                country,
                kilotons,
                year,
            });
            loaded += 1;
        }
    }

    debug!(source = source_name, loaded, "emission source read");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A source with the full 1960..=2016 column range, a filtered-out
    /// country, and a value of `<year>.5` in every cell.
    fn full_source() -> String {
        let years: Vec<String> = EMISSION_YEARS.map(|y| y.to_string()).collect();
        let mut out = String::from("\n\n\n\n");
        out.push_str("Country Name,Country Code,");
        out.push_str(&years.join(","));
        out.push('\n');
        for (country, code) in [("Canada", "CAN"), ("United States", "USA"), ("France", "FRA")] {
            out.push_str(country);
            out.push(',');
            out.push_str(code);
            for year in EMISSION_YEARS {
                out.push_str(&format!(",{}.5", year));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_keeps_only_canada_and_renamed_united_states() {
        let mut emissions = BTreeMap::new();
        let count = load(Cursor::new(full_source()), "carbon.csv", &mut emissions).unwrap();
        assert_eq!(count, 57 * 2);
        let first = emissions.get(&1960).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].country, Country::Canada);
        assert_eq!(first[1].country, Country::America);
        assert_eq!(first[0].kilotons, 1960.5);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let mut emissions = BTreeMap::new();
        load(Cursor::new(full_source()), "carbon.csv", &mut emissions).unwrap();
        assert!(emissions.contains_key(&1960));
        assert!(emissions.contains_key(&2016));
        assert!(!emissions.contains_key(&2017));
    }

    #[test]
    fn test_missing_year_column_is_fatal() {
        let data = "\n\n\n\nCountry Name,1960\nCanada,100.0\n";
        let mut emissions = BTreeMap::new();
        let err = load(Cursor::new(data), "carbon.csv", &mut emissions).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column, .. } if column == "1961"));
    }

    #[test]
    fn test_unparsable_amount_is_fatal() {
        let data = full_source().replace("Canada,CAN,1960.5", "Canada,CAN,n/a");
        let mut emissions = BTreeMap::new();
        let err = load(Cursor::new(data), "carbon.csv", &mut emissions).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }
}
