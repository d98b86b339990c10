use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::metrics;

/// JSON error body returned by every handler: `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, title = self.title, message = ?self.message, "request failed");
        }
        let body = ErrorBody { error: self.title, message: self.message.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = Some(e.to_string());
        match e {
            ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg)
            }
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", msg),
            ServiceError::Conflict(_) => Self::new(StatusCode::CONFLICT, "Conflict", msg),
            ServiceError::TooLarge(_) => Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", msg),
            ServiceError::Unsupported(_) => Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type", msg),
            ServiceError::Throttled => {
                metrics::THROTTLED_TOTAL.inc();
                Self::new(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests", msg)
            }
            ServiceError::Integration(_) => {
                metrics::INTEGRATION_FAILURES_TOTAL.inc();
                Self::new(StatusCode::BAD_GATEWAY, "Integration Failed", msg)
            }
            ServiceError::NotConfigured(_) => Self::new(StatusCode::SERVICE_UNAVAILABLE, "Not Configured", msg),
            ServiceError::Db(_) | ServiceError::Model(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_statuses() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Model(ModelError::Validation("x".into())), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::TooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (ServiceError::Unsupported("x".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ServiceError::Throttled, StatusCode::TOO_MANY_REQUESTS),
            (ServiceError::Integration("x".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::NotConfigured("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Db("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }
}
