//! View Projector
//!
//! Maps one interaction's filtered and aggregated rows onto the three
//! dashboard views:
//!
//! - **chart**: average of the selected metric per continent
//! - **map**: one choropleth point per aggregated country
//! - **table**: the filtered rows themselves, paged for display
//!
//! # Chart semantics
//!
//! The chart value for a continent is the mean of the per-country means
//! produced by the aggregator, not a mean over raw rows and not weighted
//! by population. With `year = All` a country observed in twelve years
//! counts once, the same as a country observed once. This is statistically
//! biased but kept so charts match the established dashboard output.

use crate::dataset::{Metric, Record};
use crate::pipeline::aggregate::AggregatedRow;
use serde::Serialize;

/// Rows per table page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Colour scale used for the choropleth
pub const MAP_COLOR_SCALE: &str = "Viridis";

/// Everything one interaction renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPayload {
    /// Metric the chart and map encode
    pub metric: Metric,
    pub chart: ChartSpec,
    pub map: MapSpec,
    pub table: TableSpec,
}

impl ViewPayload {
    /// Check if all three views are empty
    pub fn is_empty(&self) -> bool {
        self.chart.bars.is_empty() && self.map.points.is_empty() && self.table.rows.is_empty()
    }
}

/// Categorical bar chart: x = continent, y = average metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Category axis field
    pub x: &'static str,
    /// Value axis field
    pub y: Metric,
    /// How bar heights were computed
    pub histfunc: &'static str,
    pub bars: Vec<ChartBar>,
}

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub continent: String,
    /// Average of the metric over this continent's contributors
    pub value: f64,
    /// Number of values averaged into this bar
    pub contributors: usize,
}

/// Choropleth map keyed by location code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    /// Location field
    pub locations: &'static str,
    /// Colour field
    pub color: Metric,
    /// Hover label field
    pub hover_name: &'static str,
    pub color_scale: &'static str,
    pub points: Vec<MapPoint>,
}

/// One shaded location on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub iso_alpha: String,
    pub value: f64,
    pub country: String,
}

/// Flat listing of the filtered rows
///
/// Always carries the complete filtered set. `page_size` only tells the
/// display how to slice it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub page_size: usize,
    pub rows: Vec<Record>,
}

impl TableSpec {
    /// Number of pages at the configured page size
    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size.max(1))
    }

    /// One page of rows (zero-based). Pages past the end are empty.
    pub fn page(&self, page: usize) -> TablePage<'_> {
        let page_size = self.page_size.max(1);
        let start = page.saturating_mul(page_size).min(self.rows.len());
        let end = start.saturating_add(page_size).min(self.rows.len());

        TablePage {
            page,
            page_size,
            total_rows: self.rows.len(),
            total_pages: self.total_pages(),
            rows: &self.rows[start..end],
        }
    }
}

/// A display page of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage<'a> {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub rows: &'a [Record],
}

/// Builds view payloads at a fixed table page size
#[derive(Debug, Clone, Copy)]
pub struct ViewProjector {
    page_size: usize,
}

impl Default for ViewProjector {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewProjector {
    /// Create a projector. A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self { page_size }
    }

    /// Table page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Project filtered and aggregated rows into the three views
    pub fn project(
        &self,
        filtered: &[&Record],
        aggregated: &[AggregatedRow],
        metric: Metric,
    ) -> ViewPayload {
        ViewPayload {
            metric,
            chart: continent_chart(aggregated, metric),
            map: choropleth(aggregated, metric),
            table: TableSpec {
                page_size: self.page_size,
                rows: filtered.iter().map(|r| (*r).clone()).collect(),
            },
        }
    }
}

/// Mean of the metric per continent over aggregated (per-country) rows
pub fn continent_chart(aggregated: &[AggregatedRow], metric: Metric) -> ChartSpec {
    chart_from_values(
        aggregated
            .iter()
            .map(|row| (row.continent.as_str(), row.value(metric))),
        metric,
    )
}

/// Mean of the metric per continent directly over raw records
///
/// Used for the overview chart, which averages the whole table without
/// the per-country step.
pub fn overview_chart(records: &[Record], metric: Metric) -> ChartSpec {
    chart_from_values(
        records
            .iter()
            .map(|record| (record.continent.as_str(), record.value(metric))),
        metric,
    )
}

/// One map point per aggregated row
pub fn choropleth(aggregated: &[AggregatedRow], metric: Metric) -> MapSpec {
    MapSpec {
        locations: "iso_alpha",
        color: metric,
        hover_name: "country",
        color_scale: MAP_COLOR_SCALE,
        points: aggregated
            .iter()
            .map(|row| MapPoint {
                iso_alpha: row.iso_alpha.clone(),
                value: row.value(metric),
                country: row.country.clone(),
            })
            .collect(),
    }
}

/// Bucket (continent, value) pairs and average each bucket.
/// Bars keep the order in which continents first appear.
fn chart_from_values<'a>(
    values: impl Iterator<Item = (&'a str, f64)>,
    metric: Metric,
) -> ChartSpec {
    let mut buckets: Vec<(&str, f64, usize)> = Vec::new();

    for (continent, value) in values {
        match buckets.iter_mut().find(|(c, _, _)| *c == continent) {
            Some((_, sum, count)) => {
                *sum += value;
                *count += 1;
            }
            None => buckets.push((continent, value, 1)),
        }
    }

    ChartSpec {
        x: "continent",
        y: metric,
        histfunc: "avg",
        bars: buckets
            .into_iter()
            .map(|(continent, sum, count)| ChartBar {
                continent: continent.to_string(),
                value: sum / count as f64,
                contributors: count,
            })
            .collect(),
    }
}
