//! Dataset Store
//!
//! Loads the source table once and precomputes the domains the controls
//! are built from (distinct years, distinct continents).

use crate::dataset::error::{DataLoadError, DataLoadResult};
use crate::dataset::types::Record;
use std::collections::{BTreeSet, HashSet};
use std::io::{Read, Write};
use std::path::Path;

/// Columns the source table must provide. Any others are ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "country",
    "continent",
    "year",
    "lifeExp",
    "pop",
    "gdpPercap",
    "iso_alpha",
];

/// Immutable source table plus its derived domains
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Records in source order
    records: Vec<Record>,
    /// Distinct years, ascending
    years: Vec<i32>,
    /// Distinct continents, in order of first appearance
    continents: Vec<String>,
}

impl Dataset {
    /// Load the dataset from a CSV file
    pub fn load(path: impl AsRef<Path>) -> DataLoadResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| DataLoadError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let dataset = Self::from_reader(file)?;
        tracing::info!(
            path = ?path,
            records = dataset.len(),
            years = dataset.years.len(),
            continents = dataset.continents.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Load the dataset from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> DataLoadResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row = result?;
            // Header occupies line 1
            let line = row.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
            records.push(columns.parse_row(&row, line)?);
        }

        Self::from_records(records)
    }

    /// Build a dataset from in-memory records
    ///
    /// Fails with `DuplicateKey` if a (country, year) pair repeats.
    pub fn from_records(records: Vec<Record>) -> DataLoadResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut years = BTreeSet::new();
        let mut continents: Vec<String> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            check_record(index, record)?;
            if !seen.insert((record.country.as_str(), record.year)) {
                return Err(DataLoadError::DuplicateKey {
                    country: record.country.clone(),
                    year: record.year,
                });
            }

            years.insert(record.year);
            if !continents.iter().any(|c| c == &record.continent) {
                continents.push(record.continent.clone());
            }
        }

        Ok(Self {
            records,
            years: years.into_iter().collect(),
            continents,
        })
    }

    /// All records, in source order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct continents, in order of first appearance
    pub fn continents(&self) -> &[String] {
        &self.continents
    }

    /// Check whether a year occurs in the table
    pub fn has_year(&self, year: i32) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    /// Check whether a continent occurs in the table
    pub fn has_continent(&self, continent: &str) -> bool {
        self.continents.iter().any(|c| c == continent)
    }
}

/// Write records as CSV with the source table's column names
pub fn write_records_csv<W: Write>(records: &[Record], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Positions of the required columns within a header row
struct ColumnIndex {
    country: usize,
    continent: usize,
    year: usize,
    life_exp: usize,
    pop: usize,
    gdp_percap: usize,
    iso_alpha: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> DataLoadResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            country: find("country")?,
            continent: find("continent")?,
            year: find("year")?,
            life_exp: find("lifeExp")?,
            pop: find("pop")?,
            gdp_percap: find("gdpPercap")?,
            iso_alpha: find("iso_alpha")?,
        })
    }

    fn parse_row(&self, row: &csv::StringRecord, line: u64) -> DataLoadResult<Record> {
        let iso_alpha = field(row, self.iso_alpha, "iso_alpha", line)?;
        if !is_iso_alpha3(iso_alpha) {
            return Err(DataLoadError::InvalidIsoCode {
                line,
                value: iso_alpha.to_string(),
            });
        }

        Ok(Record {
            country: field(row, self.country, "country", line)?.to_string(),
            continent: field(row, self.continent, "continent", line)?.to_string(),
            year: parse_field(row, self.year, "year", line)?,
            life_exp: parse_float(row, self.life_exp, "lifeExp", line)?,
            pop: parse_pop(row, self.pop, line)?,
            gdp_percap: parse_float(row, self.gdp_percap, "gdpPercap", line)?,
            iso_alpha: iso_alpha.to_string(),
        })
    }
}

fn field<'a>(
    row: &'a csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> DataLoadResult<&'a str> {
    match row.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        other => Err(DataLoadError::InvalidValue {
            line,
            column: column.to_string(),
            value: other.unwrap_or_default().to_string(),
        }),
    }
}

fn parse_field<T: std::str::FromStr>(
    row: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> DataLoadResult<T> {
    let raw = field(row, idx, column, line)?;
    raw.parse().map_err(|_| DataLoadError::InvalidValue {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Metric values must be finite; `NaN` and `inf` parse as f64 but poison every mean
fn parse_float(
    row: &csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> DataLoadResult<f64> {
    let value: f64 = parse_field(row, idx, column, line)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DataLoadError::InvalidValue {
            line,
            column: column.to_string(),
            value: field(row, idx, column, line)?.to_string(),
        })
    }
}

fn is_iso_alpha3(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Row invariants shared by every construction path
fn check_record(index: usize, record: &Record) -> DataLoadResult<()> {
    let reason = if !is_iso_alpha3(&record.iso_alpha) {
        format!("iso_alpha {:?} is not a three-letter code", record.iso_alpha)
    } else if !record.life_exp.is_finite() {
        format!("lifeExp {} is not finite", record.life_exp)
    } else if !record.gdp_percap.is_finite() {
        format!("gdpPercap {} is not finite", record.gdp_percap)
    } else {
        return Ok(());
    };

    Err(DataLoadError::InvalidRecord {
        index,
        country: record.country.clone(),
        reason,
    })
}

/// Population is integral, but exports often write it as "8425333.0"
fn parse_pop(row: &csv::StringRecord, idx: usize, line: u64) -> DataLoadResult<u64> {
    let raw = field(row, idx, "pop", line)?;
    if let Ok(pop) = raw.parse::<u64>() {
        return Ok(pop);
    }

    match raw.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            Ok(value as u64)
        }
        _ => Err(DataLoadError::InvalidValue {
            line,
            column: "pop".to_string(),
            value: raw.to_string(),
        }),
    }
}
