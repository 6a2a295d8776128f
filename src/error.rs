//! Handler error type and its HTTP status mapping.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::dict::DictError;
use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unknown container or no entry for the looked-up term. Carries the
    /// term for the "nothing found" body.
    #[error("nothing found for {0:?}")]
    NotFound(String),
    #[error("invalid blob id {0:?}")]
    BadBlobId(String),
    #[error(transparent)]
    Dict(#[from] DictError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(term) => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                render::nothing_found(&term),
            )
                .into_response(),
            AppError::BadBlobId(raw) => (
                StatusCode::BAD_REQUEST,
                format!("invalid blob id: {raw}"),
            )
                .into_response(),
            AppError::Dict(DictError::BlobNotFound(blob)) => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                render::nothing_found(&blob.to_string()),
            )
                .into_response(),
            AppError::Dict(e) => {
                tracing::error!("container read failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
