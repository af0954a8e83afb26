use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const ZIP_CONTENT_TYPE: &str = "application/zip";

/// GET /cv/:id
/// Renders one CV. The generated flag is not changed.
pub async fn handle_generate_single(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let document = state.orchestrator.render_single(id).await?;
    attachment(PDF_CONTENT_TYPE, &document.file_name, document.bytes)
}

/// POST /cv/bulk-by-ids
/// Body: JSON array of ids. Returns a zip of the pending ones.
pub async fn handle_generate_by_ids(
    State(state): State<AppState>,
    Json(ids): Json<Vec<i32>>,
) -> Result<Response, AppError> {
    let bundle = state.orchestrator.render_by_ids(ids).await?;
    info!("Serving {} with CVs {:?}", bundle.file_name, bundle.ids);
    attachment(ZIP_CONTENT_TYPE, &bundle.file_name, bundle.bytes)
}

/// POST /cv/bulk-by-quantity
/// Body: a single JSON integer. Returns a zip of up to that many pending CVs.
pub async fn handle_generate_by_quantity(
    State(state): State<AppState>,
    Json(quantity): Json<i64>,
) -> Result<Response, AppError> {
    let bundle = state.orchestrator.render_by_quantity(quantity).await?;
    info!("Serving {} with CVs {:?}", bundle.file_name, bundle.ids);
    attachment(ZIP_CONTENT_TYPE, &bundle.file_name, bundle.bytes)
}

fn attachment(
    content_type: &'static str,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
