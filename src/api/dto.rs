//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.
//!
//! Selections arrive as raw control values (strings and numbers) and are
//! parsed by the pipeline, so a bad metric or year surfaces as an
//! `INVALID_SELECTION` error rather than a body rejection.

use serde::{Deserialize, Serialize};

use crate::dataset::{Metric, Record};
use crate::pipeline::{FilterSelection, SelectionResult, TablePage, YearSelector, YearValue};

// ============================================
// DASHBOARD DTOs
// ============================================

/// Apply-button request: the current control values
#[derive(Debug, Deserialize)]
pub struct DashboardRequest {
    /// Metric name: pop, lifeExp, gdpPercap
    pub metric: String,
    /// Year or "All" (default: "All")
    #[serde(default)]
    pub year: YearValue,
    /// Selected continents
    pub continents: Vec<String>,
}

impl DashboardRequest {
    /// Parse into a selection
    pub fn to_selection(&self) -> SelectionResult<FilterSelection> {
        let year = YearSelector::try_from(self.year.clone())?;
        FilterSelection::from_controls(&self.metric, year, &self.continents)
    }
}

/// Query-string selection shared by the table and export endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SelectionParams {
    /// Metric name (default: the dashboard's default metric)
    #[serde(default)]
    pub metric: Option<String>,
    /// Year or "All" (default: "All")
    #[serde(default)]
    pub year: Option<String>,
    /// Comma-separated continents (default: every continent)
    #[serde(default)]
    pub continents: Option<String>,
}

impl SelectionParams {
    /// Parse into a selection, filling gaps from `defaults`
    pub fn to_selection(&self, defaults: &FilterSelection) -> SelectionResult<FilterSelection> {
        let metric = self
            .metric
            .clone()
            .unwrap_or_else(|| defaults.metric.to_string());
        let year = self.year.clone().unwrap_or_else(|| defaults.year.to_string());
        let continents: Vec<String> = match &self.continents {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.continents.iter().cloned().collect(),
        };

        FilterSelection::parse(&metric, &year, &continents)
    }
}

/// Table page query parameters
#[derive(Debug, Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub continents: Option<String>,
    /// Zero-based page index (default: 0)
    #[serde(default)]
    pub page: usize,
}

impl TableParams {
    pub fn selection(&self) -> SelectionParams {
        SelectionParams {
            metric: None,
            year: self.year.clone(),
            continents: self.continents.clone(),
        }
    }
}

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub continents: Option<String>,
    /// Format: csv, json
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

impl ExportParams {
    pub fn selection(&self) -> SelectionParams {
        SelectionParams {
            metric: None,
            year: self.year.clone(),
            continents: self.continents.clone(),
        }
    }
}

/// Overview chart query parameters
#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    #[serde(default)]
    pub metric: Option<String>,
}

// ============================================
// OPTIONS DTOs
// ============================================

/// Everything the page needs to build its controls
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// Page title
    pub title: String,
    /// Metric choices
    pub metrics: Vec<Metric>,
    /// Year choices: every year in the dataset, then "All"
    pub years: Vec<YearSelector>,
    /// Continent choices
    pub continents: Vec<String>,
    /// Initial control values
    pub defaults: FilterSelection,
    /// Table rows per page
    pub page_size: usize,
}

// ============================================
// TABLE DTOs
// ============================================

/// One page of the filtered table
#[derive(Debug, Serialize)]
pub struct TablePageResponse {
    /// Zero-based page index
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub rows: Vec<Record>,
}

impl From<TablePage<'_>> for TablePageResponse {
    fn from(page: TablePage<'_>) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total_rows: page.total_rows,
            total_pages: page.total_pages,
            rows: page.rows.to_vec(),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Number of records loaded
    pub records: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
