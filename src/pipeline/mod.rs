//! Worldpop Dashboard Pipeline
//!
//! Turns one snapshot of the dashboard controls into the three views the
//! page renders:
//!
//! - **selection**: The control snapshot (metric, year or All, continents)
//! - **filter**: Keep records matching year and continents
//! - **aggregate**: Collapse to per-country means
//! - **projection**: Build the chart, map and table payloads
//! - **controller**: Validate and run the stages for one interaction
//!
//! # Execution Pipeline
//!
//! ```text
//! FilterSelection → Validate → Filter → Aggregate → Project → ViewPayload
//!                                 │                     ▲
//!                                 └──── table rows ─────┘
//! ```
//!
//! Every stage is synchronous and pure. An empty continent set, or a
//! filter that matches nothing, flows through as empty views.
//!
//! # Example
//!
//! ```rust,ignore
//! use worldpop::dataset::{Dataset, Metric};
//! use worldpop::pipeline::{FilterSelection, InteractionController, Trigger};
//! use std::sync::Arc;
//!
//! let dataset = Arc::new(Dataset::load("data/gapminder_sample.csv")?);
//! let controller = InteractionController::new(dataset);
//!
//! let selection = FilterSelection::new(Metric::Pop)
//!     .in_year(2007)
//!     .continents(["Asia", "Europe"]);
//!
//! let payload = controller.handle(Trigger, &selection)?;
//! println!("{} bars, {} countries", payload.chart.bars.len(), payload.map.points.len());
//! ```

mod aggregate;
mod controller;
mod error;
mod filter;
mod projection;
mod selection;

pub use aggregate::{aggregate, AggregatedRow};
pub use controller::{InteractionController, SelectionPolicy, Trigger};
pub use error::{SelectionError, SelectionResult};
pub use filter::{filter_records, matches};
pub use projection::{
    choropleth, continent_chart, overview_chart, ChartBar, ChartSpec, MapPoint, MapSpec,
    TablePage, TableSpec, ViewPayload, ViewProjector, DEFAULT_PAGE_SIZE, MAP_COLOR_SCALE,
};
pub use selection::{FilterSelection, YearSelector, YearValue, ALL_YEARS};
