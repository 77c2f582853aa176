//! Filter selections
//!
//! A `FilterSelection` is the snapshot of the dashboard controls at the
//! moment the user asks for a refresh: one metric, one year (or all of
//! them) and a set of continents.

use crate::dataset::{Dataset, Metric};
use crate::pipeline::error::{SelectionError, SelectionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel the year control uses for "every year"
pub const ALL_YEARS: &str = "All";

/// Year control value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearValue", into = "YearValue")]
pub enum YearSelector {
    /// No year constraint
    All,
    /// Exactly this year
    Year(i32),
}

impl YearSelector {
    /// Parse a control value: an integer year or "All"
    pub fn parse(s: &str) -> SelectionResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_YEARS) {
            return Ok(YearSelector::All);
        }

        s.parse::<i32>()
            .map(YearSelector::Year)
            .map_err(|_| SelectionError::InvalidYear(s.to_string()))
    }

    /// Check whether a year passes this selector
    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearSelector::All => true,
            YearSelector::Year(y) => *y == year,
        }
    }
}

impl std::fmt::Display for YearSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearSelector::All => f.write_str(ALL_YEARS),
            YearSelector::Year(y) => write!(f, "{}", y),
        }
    }
}

/// Wire form of the year control: a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

impl Default for YearValue {
    fn default() -> Self {
        YearValue::Text(ALL_YEARS.to_string())
    }
}

impl TryFrom<YearValue> for YearSelector {
    type Error = SelectionError;

    fn try_from(raw: YearValue) -> Result<Self, Self::Error> {
        match raw {
            YearValue::Number(n) => i32::try_from(n)
                .map(YearSelector::Year)
                .map_err(|_| SelectionError::InvalidYear(n.to_string())),
            YearValue::Text(s) => YearSelector::parse(&s),
        }
    }
}

impl From<YearSelector> for YearValue {
    fn from(year: YearSelector) -> Self {
        match year {
            YearSelector::All => YearValue::Text(ALL_YEARS.to_string()),
            YearSelector::Year(y) => YearValue::Number(y as i64),
        }
    }
}

/// Snapshot of the dashboard controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Metric to chart and map
    pub metric: Metric,
    /// Year constraint
    pub year: YearSelector,
    /// Continents to keep. Empty keeps nothing.
    pub continents: BTreeSet<String>,
}

impl FilterSelection {
    /// Create a selection for a metric over all years and no continents
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            year: YearSelector::All,
            continents: BTreeSet::new(),
        }
    }

    /// The controls' initial state: every year, every continent
    pub fn defaults(dataset: &Dataset, metric: Metric) -> Self {
        Self::new(metric).continents(dataset.continents().iter().cloned())
    }

    /// Parse raw control values
    pub fn parse(metric: &str, year: &str, continents: &[String]) -> SelectionResult<Self> {
        Self::from_controls(metric, YearSelector::parse(year)?, continents)
    }

    /// Build from a metric name, an already-parsed year and continents
    pub fn from_controls(
        metric: &str,
        year: YearSelector,
        continents: &[String],
    ) -> SelectionResult<Self> {
        let metric =
            Metric::from_str(metric).ok_or_else(|| SelectionError::UnknownMetric(metric.to_string()))?;

        Ok(Self::new(metric)
            .year(year)
            .continents(continents.iter().cloned()))
    }

    /// Builder method: set the year constraint
    pub fn year(mut self, year: YearSelector) -> Self {
        self.year = year;
        self
    }

    /// Builder method: restrict to a single year
    pub fn in_year(self, year: i32) -> Self {
        self.year(YearSelector::Year(year))
    }

    /// Builder method: add a continent
    pub fn continent(mut self, continent: impl Into<String>) -> Self {
        self.continents.insert(continent.into());
        self
    }

    /// Builder method: add several continents
    pub fn continents<I, S>(mut self, continents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.continents
            .extend(continents.into_iter().map(Into::into));
        self
    }

    /// Builder method: change the metric
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    #[test]
    fn test_year_parse() {
        assert_eq!(YearSelector::parse("All").unwrap(), YearSelector::All);
        assert_eq!(YearSelector::parse("all").unwrap(), YearSelector::All);
        assert_eq!(YearSelector::parse("2007").unwrap(), YearSelector::Year(2007));
        assert!(matches!(
            YearSelector::parse("last year"),
            Err(SelectionError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_year_matches() {
        assert!(YearSelector::All.matches(1952));
        assert!(YearSelector::Year(1952).matches(1952));
        assert!(!YearSelector::Year(1952).matches(1957));
    }

    #[test]
    fn test_year_serde() {
        let year: YearSelector = serde_json::from_str("2007").unwrap();
        assert_eq!(year, YearSelector::Year(2007));

        let year: YearSelector = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(year, YearSelector::All);

        let year: YearSelector = serde_json::from_str("\"1952\"").unwrap();
        assert_eq!(year, YearSelector::Year(1952));

        assert!(serde_json::from_str::<YearSelector>("\"soon\"").is_err());

        assert_eq!(serde_json::to_string(&YearSelector::All).unwrap(), "\"All\"");
        assert_eq!(serde_json::to_string(&YearSelector::Year(1977)).unwrap(), "1977");
    }

    #[test]
    fn test_selection_deserialize() {
        let json = r#"{"metric": "gdpPercap", "year": 2007, "continents": ["Asia", "Europe"]}"#;
        let selection: FilterSelection = serde_json::from_str(json).unwrap();

        assert_eq!(selection.metric, Metric::GdpPercap);
        assert_eq!(selection.year, YearSelector::Year(2007));
        assert_eq!(selection.continents.len(), 2);
    }

    #[test]
    fn test_selection_parse() {
        let continents = vec!["Asia".to_string(), "Asia".to_string()];
        let selection = FilterSelection::parse("pop", "All", &continents).unwrap();

        assert_eq!(selection.metric, Metric::Pop);
        assert_eq!(selection.year, YearSelector::All);
        assert_eq!(selection.continents.len(), 1);

        assert!(matches!(
            FilterSelection::parse("population", "All", &continents),
            Err(SelectionError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_defaults_select_everything() {
        let dataset = Dataset::from_records(vec![
            Record::new("A", "Asia", 1952, "AAA"),
            Record::new("B", "Europe", 1952, "BBB"),
        ])
        .unwrap();

        let selection = FilterSelection::defaults(&dataset, Metric::LifeExp);

        assert_eq!(selection.metric, Metric::LifeExp);
        assert_eq!(selection.year, YearSelector::All);
        assert!(selection.continents.contains("Asia"));
        assert!(selection.continents.contains("Europe"));
    }
}
