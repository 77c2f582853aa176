//! # Worldpop
//!
//! World Population Data - turns a table of country indicators into the
//! three linked views of an interactive dashboard.
//!
//! ## Features
//!
//! - **Dataset store**: CSV loading with column and value checks
//! - **Pipeline**: filter, per-country aggregation, chart/map/table projection
//! - **Validation**: selections outside the dataset's domains are rejected
//! - **HTTP API**: the apply button, control options, table paging, export
//!
//! ## Modules
//!
//! - [`dataset`]: Source table and its derived domains
//! - [`pipeline`]: Selection, filter, aggregate, project, controller
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use worldpop::dataset::{Dataset, Metric};
//! use worldpop::pipeline::{FilterSelection, InteractionController, Trigger};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Arc::new(Dataset::load("data/gapminder_sample.csv")?);
//!     let controller = InteractionController::new(dataset);
//!
//!     let selection = FilterSelection::new(Metric::LifeExp)
//!         .in_year(2007)
//!         .continents(["Africa", "Asia"]);
//!     let payload = controller.handle(Trigger, &selection)?;
//!
//!     for bar in &payload.chart.bars {
//!         println!("{}: {:.2}", bar.continent, bar.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod pipeline;

use std::sync::Arc;

// Re-export top-level types for convenience
pub use dataset::{DataLoadError, DataLoadResult, Dataset, Metric, Record};

pub use pipeline::{
    AggregatedRow, ChartSpec, FilterSelection, InteractionController, MapSpec, SelectionError,
    SelectionPolicy, SelectionResult, TableSpec, Trigger, ViewPayload, YearSelector,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, DatasetConfig, LoggingConfig};

/// Load the configured dataset and wrap it in a controller
pub fn load_controller(config: &Config) -> DataLoadResult<InteractionController> {
    let dataset = Dataset::load(&config.dataset.path)?;
    if dataset.is_empty() {
        tracing::warn!(path = ?config.dataset.path, "Dataset has no rows");
    }

    Ok(InteractionController::new(Arc::new(dataset))
        .with_policy(config.dataset.selection_policy)
        .with_page_size(config.dashboard.page_size))
}
