//! Table Routes
//!
//! - GET /api/v1/table - One display page of the filtered rows

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{TablePageResponse, TableParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::pipeline::TableSpec;

/// GET /api/v1/table?year=2007&continents=Asia,Europe&page=0
///
/// Pages past the end return an empty row list with the real totals.
pub async fn get_table_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TableParams>,
) -> ApiResult<Json<TablePageResponse>> {
    let selection = params
        .selection()
        .to_selection(&state.default_selection())?;

    let table = TableSpec {
        page_size: state.controller.page_size(),
        rows: state.controller.filtered(&selection)?,
    };

    Ok(Json(table.page(params.page).into()))
}
