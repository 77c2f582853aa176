//! Interaction Controller
//!
//! Runs the full pipeline for one user interaction:
//!
//! ```text
//! Trigger + FilterSelection → Validate → Filter → Aggregate → Project → ViewPayload
//! ```
//!
//! The dataset is shared read-only, so any number of interactions may run
//! at once from different threads without coordination. Identical
//! selections always produce identical payloads.

use crate::dataset::{Dataset, Metric, Record};
use crate::pipeline::aggregate::aggregate;
use crate::pipeline::error::{SelectionError, SelectionResult};
use crate::pipeline::filter::filter_records;
use crate::pipeline::projection::{overview_chart, ChartSpec, ViewPayload, ViewProjector};
use crate::pipeline::selection::{FilterSelection, YearSelector};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

/// "Recompute now". Carries no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trigger;

/// How selections outside the dataset's domains are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Reject unknown years and continents
    #[default]
    Strict,
    /// Pass them through; they match no rows
    Permissive,
}

impl SelectionPolicy {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "permissive" => Some(Self::Permissive),
            _ => None,
        }
    }
}

/// Orchestrates filter, aggregate and project over a shared dataset
#[derive(Debug, Clone)]
pub struct InteractionController {
    dataset: Arc<Dataset>,
    projector: ViewProjector,
    policy: SelectionPolicy,
}

impl InteractionController {
    /// Create a controller with strict validation and the default page size
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            projector: ViewProjector::default(),
            policy: SelectionPolicy::Strict,
        }
    }

    /// Builder method: set the selection policy
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder method: set the table page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.projector = ViewProjector::new(page_size);
        self
    }

    /// The dataset this controller reads
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Active selection policy
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Table page size
    pub fn page_size(&self) -> usize {
        self.projector.page_size()
    }

    /// Handle one interaction
    ///
    /// Either returns all three views or fails before any work is done.
    pub fn handle(
        &self,
        _trigger: Trigger,
        selection: &FilterSelection,
    ) -> SelectionResult<ViewPayload> {
        self.validate(selection)?;

        let start = Instant::now();
        let payload = self.run(selection);

        tracing::debug!(
            metric = %selection.metric,
            year = %selection.year,
            continents = selection.continents.len(),
            rows = payload.table.rows.len(),
            countries = payload.map.points.len(),
            bars = payload.chart.bars.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Interaction handled"
        );

        Ok(payload)
    }

    /// Check a selection against the dataset's domains
    pub fn validate(&self, selection: &FilterSelection) -> SelectionResult<()> {
        if self.policy == SelectionPolicy::Permissive {
            return Ok(());
        }

        if let YearSelector::Year(year) = selection.year {
            if !self.dataset.has_year(year) {
                tracing::warn!(year, "Rejected selection with unknown year");
                return Err(SelectionError::UnknownYear(year));
            }
        }

        if let Some(continent) = selection
            .continents
            .iter()
            .find(|c| !self.dataset.has_continent(c))
        {
            tracing::warn!(continent = %continent, "Rejected selection with unknown continent");
            return Err(SelectionError::UnknownContinent(continent.clone()));
        }

        Ok(())
    }

    /// Filtered rows for a selection, without aggregation
    pub fn filtered(&self, selection: &FilterSelection) -> SelectionResult<Vec<Record>> {
        self.validate(selection)?;
        Ok(filter_records(&self.dataset, selection)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Per-continent average of a metric over the whole table
    pub fn overview(&self, metric: Metric) -> ChartSpec {
        overview_chart(self.dataset.records(), metric)
    }

    fn run(&self, selection: &FilterSelection) -> ViewPayload {
        let filtered = filter_records(&self.dataset, selection);
        tracing::trace!(rows = filtered.len(), "Filter stage complete");

        let aggregated = aggregate(&filtered);
        tracing::trace!(groups = aggregated.len(), "Aggregate stage complete");

        self.projector
            .project(&filtered, &aggregated, selection.metric)
    }
}
