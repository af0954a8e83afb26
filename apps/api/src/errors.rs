use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::batch::archive::ArchiveError;
use crate::batch::BatchError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::NothingToDo(msg) => AppError::NotFound(msg),
            BatchError::InvalidQuantity(_) => AppError::Validation(err.to_string()),
            BatchError::Malformed { .. } => AppError::UnprocessableEntity(err.to_string()),
            BatchError::Render(e) => AppError::Render(e),
            BatchError::Archive(e) => AppError::Archive(e),
            BatchError::Task(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The document could not be rendered".to_string(),
                )
            }
            AppError::Archive(e) => {
                tracing::error!("Archive error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ARCHIVE_ERROR",
                    "The archive could not be built".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_errors_map_to_statuses() {
        let cases = [
            (BatchError::NothingToDo("none".into()), StatusCode::NOT_FOUND),
            (BatchError::InvalidQuantity(0), StatusCode::BAD_REQUEST),
            (
                BatchError::Archive(ArchiveError::Io(std::io::Error::other("disk"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_malformed_record_is_unprocessable() {
        let source = crate::record::CandidateRecord::parse("{").unwrap_err();
        let err = AppError::from(BatchError::Malformed { id: 3, source });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
