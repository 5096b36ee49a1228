use std::path::PathBuf;

use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ErrorResponse;

/// Failures of the flat-file store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not hold a JSON array of location records")]
    Corrupt { path: PathBuf },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("{0}")]
    MalformedPayload(String),

    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the response. Store failures only expose their detail in debug mode.
    pub fn into_response_with(self, debug: bool) -> Response {
        let status = self.status();
        let error = match &self {
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                if debug {
                    e.to_string()
                } else {
                    "Internal server error.".to_string()
                }
            }
            other => {
                tracing::debug!(status = %status, error = %other, "request rejected");
                other.to_string()
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}
