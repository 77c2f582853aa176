//! Options Routes
//!
//! - GET /api/v1/options - Control choices and initial values

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::OptionsResponse;
use crate::api::state::AppState;
use crate::dataset::Metric;
use crate::pipeline::YearSelector;

/// GET /api/v1/options
///
/// Choices for the metric, year and continent controls, plus the values
/// they start with.
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    let dataset = state.dataset();

    let years = dataset
        .years()
        .iter()
        .map(|y| YearSelector::Year(*y))
        .chain(std::iter::once(YearSelector::All))
        .collect();

    Json(OptionsResponse {
        title: state.dashboard.title.clone(),
        metrics: Metric::all().to_vec(),
        years,
        continents: dataset.continents().to_vec(),
        defaults: state.default_selection(),
        page_size: state.controller.page_size(),
    })
}
