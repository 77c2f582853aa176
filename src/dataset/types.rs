//! Core data types for the dataset store
//!
//! - `Record`: one country/year row of the source table
//! - `Metric`: the numeric indicators a user can chart

use serde::{Deserialize, Serialize};

/// A single row of the source table
///
/// Field names serialize with the column names of the source table so a
/// record can be handed to the table view as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Country name (entity identifier)
    pub country: String,
    /// Continent the country belongs to
    pub continent: String,
    /// Observation year
    pub year: i32,
    /// Life expectancy at birth, in years
    #[serde(rename = "lifeExp")]
    pub life_exp: f64,
    /// Population
    pub pop: u64,
    /// GDP per capita
    #[serde(rename = "gdpPercap")]
    pub gdp_percap: f64,
    /// ISO 3166-1 alpha-3 location code
    pub iso_alpha: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        country: impl Into<String>,
        continent: impl Into<String>,
        year: i32,
        iso_alpha: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            continent: continent.into(),
            year,
            life_exp: 0.0,
            pop: 0,
            gdp_percap: 0.0,
            iso_alpha: iso_alpha.into(),
        }
    }

    /// Builder method: set life expectancy
    pub fn life_exp(mut self, value: f64) -> Self {
        self.life_exp = value;
        self
    }

    /// Builder method: set population
    pub fn pop(mut self, value: u64) -> Self {
        self.pop = value;
        self
    }

    /// Builder method: set GDP per capita
    pub fn gdp_percap(mut self, value: f64) -> Self {
        self.gdp_percap = value;
        self
    }

    /// Value of the given metric as a float
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Pop => self.pop as f64,
            Metric::LifeExp => self.life_exp,
            Metric::GdpPercap => self.gdp_percap,
        }
    }
}

/// Numeric indicators available for charting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Population
    #[serde(rename = "pop")]
    Pop,
    /// Life expectancy
    #[serde(rename = "lifeExp")]
    LifeExp,
    /// GDP per capita
    #[serde(rename = "gdpPercap")]
    GdpPercap,
}

impl Metric {
    /// All metrics, in the order the controls list them
    pub fn all() -> &'static [Metric] {
        &[Metric::Pop, Metric::LifeExp, Metric::GdpPercap]
    }

    /// Column name of this metric
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Pop => "pop",
            Metric::LifeExp => "lifeExp",
            Metric::GdpPercap => "gdpPercap",
        }
    }

    /// Parse from a column name. Matching is exact.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pop" => Some(Metric::Pop),
            "lifeExp" => Some(Metric::LifeExp),
            "gdpPercap" => Some(Metric::GdpPercap),
            _ => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
