//! Dashboard Routes
//!
//! - POST /api/v1/dashboard - Apply the current controls, return all views
//! - GET /api/v1/overview - Per-continent average over the whole table

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DashboardRequest, OverviewParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dataset::Metric;
use crate::pipeline::{ChartSpec, SelectionError, Trigger, ViewPayload};

/// POST /api/v1/dashboard
///
/// The apply button. Runs the pipeline once for the submitted controls and
/// returns chart, map and table together. On error nothing is returned,
/// so the page keeps what it last rendered.
pub async fn apply(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DashboardRequest>,
) -> ApiResult<Json<ViewPayload>> {
    let selection = req.to_selection()?;
    let payload = state.controller.handle(Trigger, &selection)?;

    Ok(Json(payload))
}

/// GET /api/v1/overview
///
/// Average of one metric per continent over every record, without the
/// per-country step.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OverviewParams>,
) -> ApiResult<Json<ChartSpec>> {
    let metric = match params.metric.as_deref() {
        None => state.dashboard.default_metric,
        Some(name) => Metric::from_str(name)
            .ok_or_else(|| ApiError::from(SelectionError::UnknownMetric(name.to_string())))?,
    };

    Ok(Json(state.controller.overview(metric)))
}
