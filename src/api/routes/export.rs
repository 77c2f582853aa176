//! Export Routes
//!
//! - GET /api/v1/export - Download the filtered table as CSV or JSON

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dataset::{write_records_csv, Record};

/// GET /api/v1/export?year=2007&continents=Africa&format=csv
///
/// Every filtered row, in source order, with the source column names.
pub async fn export_table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let format = params.format.to_lowercase();
    let content_type = match format.as_str() {
        "csv" => "text/csv",
        "json" => "application/json",
        other => {
            return Err(ApiError::Validation(format!(
                "Unsupported export format: {}",
                other
            )))
        }
    };

    let selection = params
        .selection()
        .to_selection(&state.default_selection())?;
    let rows = state.controller.filtered(&selection)?;

    let body = match format.as_str() {
        "csv" => format_csv(&rows)?,
        _ => format_json(&rows)?,
    };

    tracing::info!(rows = rows.len(), format = %format, "Table exported");

    let disposition = format!("attachment; filename=\"worldpop_export.{}\"", format);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        Body::from(body),
    )
        .into_response())
}

fn format_csv(rows: &[Record]) -> ApiResult<Vec<u8>> {
    let mut out = Vec::new();
    write_records_csv(rows, &mut out)
        .map_err(|e| ApiError::Internal(format!("CSV export failed: {}", e)))?;
    Ok(out)
}

fn format_json(rows: &[Record]) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(rows).map_err(|e| ApiError::Internal(format!("JSON export failed: {}", e)))
}
