//! Worldpop Dataset Store
//!
//! Holds the immutable country/year indicator table the dashboard is built on:
//!
//! - **types**: Core data structures (Record, Metric)
//! - **store**: The loaded Dataset and its precomputed domains
//! - **error**: Load-time error types
//!
//! # Lifecycle
//!
//! ```text
//! CSV source → header check → row parse → invariant check → Dataset (read-only)
//! ```
//!
//! The dataset is built once at startup and shared by reference for the
//! lifetime of the process. Nothing in the crate mutates it afterwards.
//!
//! # Example
//!
//! ```rust,no_run
//! use worldpop::dataset::Dataset;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Dataset::load("data/gapminder_sample.csv")?;
//!     println!("{} records, years {:?}", dataset.len(), dataset.years());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{DataLoadError, DataLoadResult};
pub use store::{write_records_csv, Dataset, REQUIRED_COLUMNS};
pub use types::{Metric, Record};
