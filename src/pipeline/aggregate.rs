//! Aggregator
//!
//! Collapses filtered rows to one row per (country, continent, iso_alpha)
//! key, replacing each metric with its unweighted mean over the collapsed
//! rows. Output rows are ordered by key, lexicographically.

use crate::dataset::{Metric, Record};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-country means over the filtered rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub country: String,
    pub continent: String,
    pub iso_alpha: String,
    /// Mean population
    pub pop: f64,
    /// Mean life expectancy
    #[serde(rename = "lifeExp")]
    pub life_exp: f64,
    /// Mean GDP per capita
    #[serde(rename = "gdpPercap")]
    pub gdp_percap: f64,
    /// Number of rows collapsed into this one
    pub samples: usize,
}

impl AggregatedRow {
    /// Mean value of the given metric
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Pop => self.pop,
            Metric::LifeExp => self.life_exp,
            Metric::GdpPercap => self.gdp_percap,
        }
    }
}

/// Running sums for one group
#[derive(Default)]
struct Accumulator {
    pop: u128,
    life_exp: f64,
    gdp_percap: f64,
    samples: usize,
}

impl Accumulator {
    fn add(&mut self, record: &Record) {
        self.pop += record.pop as u128;
        self.life_exp += record.life_exp;
        self.gdp_percap += record.gdp_percap;
        self.samples += 1;
    }
}

/// Group rows by entity and average every metric
pub fn aggregate(rows: &[&Record]) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<(&str, &str, &str), Accumulator> = BTreeMap::new();

    for record in rows {
        groups
            .entry((
                record.country.as_str(),
                record.continent.as_str(),
                record.iso_alpha.as_str(),
            ))
            .or_default()
            .add(record);
    }

    groups
        .into_iter()
        .map(|((country, continent, iso_alpha), acc)| {
            // A group always holds at least one row
            let n = acc.samples as f64;
            AggregatedRow {
                country: country.to_string(),
                continent: continent.to_string(),
                iso_alpha: iso_alpha.to_string(),
                pop: acc.pop as f64 / n,
                life_exp: acc.life_exp / n,
                gdp_percap: acc.gdp_percap / n,
                samples: acc.samples,
            }
        })
        .collect()
}
