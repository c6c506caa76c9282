//! HTTP error envelope and status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Serialize;
use trivia_core::{RepoError, ServiceError};

/// Failure returned by a handler, rendered as
/// `{"success": false, "error": <status>, "message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// 400: malformed or incomplete input.
    BadRequest(String),
    /// 404: resource or page does not exist.
    NotFound(String),
    /// 422: well-formed request that cannot be applied.
    Unprocessable(String),
    /// 500: storage or server failure.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad request",
            Self::NotFound(_) => "resource not found",
            Self::Unprocessable(_) => "unprocessable",
            Self::Internal(_) => "internal server error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::BadRequest(detail)
            | Self::NotFound(detail)
            | Self::Unprocessable(detail)
            | Self::Internal(detail) => detail,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            ServiceError::NotFound(id) => Self::NotFound(format!("question {id} not found")),
            ServiceError::NoQuestionsAvailable => {
                Self::NotFound("no questions available".to_string())
            }
            ServiceError::Store(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=server status={} detail=\"{}\"",
                status.as_u16(),
                self.detail()
            );
        } else {
            warn!(
                "event=http_error module=server status={} detail=\"{}\"",
                status.as_u16(),
                self.detail()
            );
        }

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
