//! Filter Evaluator
//!
//! Keeps the records matching a selection's year and continent set.
//! The metric plays no part in filtering.

use crate::dataset::{Dataset, Record};
use crate::pipeline::selection::FilterSelection;

/// Check if a record passes the selection
pub fn matches(record: &Record, selection: &FilterSelection) -> bool {
    selection.year.matches(record.year) && selection.continents.contains(&record.continent)
}

/// Records passing the selection, in source order
pub fn filter_records<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Vec<&'a Record> {
    if selection.continents.is_empty() {
        return Vec::new();
    }

    dataset
        .records()
        .iter()
        .filter(|record| matches(record, selection))
        .collect()
}
