use crate::model::ErrorResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::StoreError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid JSON format")]
    InvalidJson(#[from] JsonRejection),
    #[error("Invalid URL format. Must be http:// or https://")]
    InvalidUrl,
    #[error("Content-Type must be application/json")]
    UnsupportedContentType,
    #[error("Short URL not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) | AppError::InvalidUrl | AppError::UnsupportedContentType => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(e) if e.is_missing() => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Unavailable(_) | StoreError::Closed) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::InvalidJson(rejection) => ErrorResponse {
                error: self.to_string(),
                details: Some(rejection.body_text()),
            },
            // Unknown and expired codes look the same to clients.
            AppError::Store(e) if e.is_missing() => ErrorResponse {
                error: AppError::NotFound.to_string(),
                details: None,
            },
            AppError::Store(StoreError::Unavailable(_) | StoreError::Closed) => ErrorResponse {
                error: "Storage unavailable".to_string(),
                details: None,
            },
            AppError::Store(e) => ErrorResponse {
                error: "Internal server error".to_string(),
                details: Some(e.to_string()),
            },
            _ => ErrorResponse {
                error: self.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
