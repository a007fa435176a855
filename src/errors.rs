use crate::merge::MergeError;
use crate::models::ErrorResponse;
use crate::store::StoreError;
use axum::{http::StatusCode, Json};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid API key")]
    Unauthorized,
    #[error("{context}")]
    Upstream {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wraps a store failure with a caller-facing summary.
    pub fn upstream(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Upstream { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MergeError> for AppError {
    fn from(err: MergeError) -> Self {
        match err {
            MergeError::Invalid(message) => Self::Validation(message),
            missing @ MergeError::NotFound(_) => Self::NotFound(missing.to_string()),
        }
    }
}

impl From<crate::locale::FormatError> for AppError {
    fn from(err: crate::locale::FormatError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let details = match &self {
            Self::Upstream { context, source } => {
                error!(error = %source, "{context}");
                Some(source.to_string())
            }
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            details,
        };
        (self.status(), Json(body)).into_response()
    }
}
