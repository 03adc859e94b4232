use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use turnstile_core::AppError;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::LockUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        }

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
