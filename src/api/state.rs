//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::{ApiConfig, DashboardConfig};
use crate::dataset::Dataset;
use crate::pipeline::{FilterSelection, InteractionController};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Pipeline over the loaded dataset
    pub controller: Arc<InteractionController>,
    /// Dashboard presentation settings
    pub dashboard: Arc<DashboardConfig>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        controller: Arc<InteractionController>,
        dashboard: DashboardConfig,
        config: ApiConfig,
    ) -> Self {
        Self {
            controller,
            dashboard: Arc::new(dashboard),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// The loaded dataset
    pub fn dataset(&self) -> &Dataset {
        self.controller.dataset()
    }

    /// Initial state of the dashboard controls
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::defaults(self.dataset(), self.dashboard.default_metric)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
