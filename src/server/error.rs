//! HTTP error mapping
//!
//! Maps workflow outcomes onto status codes:
//! - caller not authenticated, not a member, or below MAINTAINER → 401
//! - malformed input or an existence conflict → 400
//! - upstream retrieval or mutation failure → 500

use crate::error::WorkflowError;
use crate::server::dto::ErrorBody;
use axum::Json;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

/// Status code for a workflow failure
pub fn status_for(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::Unauthenticated
        | WorkflowError::NotAMember { .. }
        | WorkflowError::InsufficientPermission { .. } => StatusCode::UNAUTHORIZED,
        WorkflowError::InputInvalid(_)
        | WorkflowError::NotMaskable { .. }
        | WorkflowError::AlreadyExists { .. }
        | WorkflowError::NotFound { .. } => StatusCode::BAD_REQUEST,
        WorkflowError::UpstreamUnavailable { .. } | WorkflowError::UpstreamRejected { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(error: WorkflowError) -> Self {
        Self::new(status_for(&error), error.to_string())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::AccessLevel;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WorkflowError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                WorkflowError::NotAMember { group_id: 1 },
                StatusCode::UNAUTHORIZED,
            ),
            (
                WorkflowError::InsufficientPermission {
                    group_id: 1,
                    actual: AccessLevel::Reporter,
                    required: AccessLevel::Maintainer,
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                WorkflowError::missing_param("key"),
                StatusCode::BAD_REQUEST,
            ),
            (
                WorkflowError::NotMaskable { pattern: "x" },
                StatusCode::BAD_REQUEST,
            ),
            (
                WorkflowError::AlreadyExists { key: "K".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                WorkflowError::NotFound { key: "K".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                WorkflowError::UpstreamUnavailable { what: "x" },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WorkflowError::UpstreamRejected { action: "Creating" },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(status_for(&error), status, "{:?}", error);
        }
    }

    #[test]
    fn test_api_error_from_workflow_keeps_message() {
        let err = ApiError::from(WorkflowError::NotFound {
            key: "MISSING".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("MISSING"));
    }
}
