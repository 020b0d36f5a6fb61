//! Error types for gitlab-helper
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to HTTP responses at the boundary (see `server::error`).

use crate::gitlab::AccessLevel;
use thiserror::Error;

/// Failures while assembling or serving the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("GitLab client error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Failures of a single upstream call.
///
/// The client classifies every failure into one of these before logging it;
/// callers of the client only ever see an absent result.
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitLab API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from GitLab: {0}")]
    InvalidResponse(String),
}

impl GitLabError {
    /// Create an error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        GitLabError::Api {
            status,
            message: if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.to_string()
            },
        }
    }

    /// HTTP status of the upstream response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            GitLabError::Api { status, .. } => Some(*status),
            GitLabError::Request(e) => e.status().map(|s| s.as_u16()),
            GitLabError::InvalidResponse(_) => None,
        }
    }
}

/// Service credential errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No authentication configured")]
    NotConfigured,

    #[error("Invalid token format")]
    InvalidToken,
}

/// Outcomes of the authorization gate and variable workflow that end a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Invalid GitLab user's personal access token")]
    Unauthenticated,

    #[error("GitLab user is not member of group {group_id}")]
    NotAMember { group_id: u64 },

    #[error(
        "GitLab user has insufficient access permissions in group {group_id} - at least {required} permission is required"
    )]
    InsufficientPermission {
        group_id: u64,
        actual: AccessLevel,
        required: AccessLevel,
    },

    #[error("{0}")]
    InputInvalid(String),

    #[error("Param 'value' is not maskable - must fulfill regex '{pattern}'")]
    NotMaskable { pattern: &'static str },

    #[error("Group variable '{key}' already exists")]
    AlreadyExists { key: String },

    #[error("Group variable '{key}' does not exist")]
    NotFound { key: String },

    #[error("Retrieving {what} failed")]
    UpstreamUnavailable { what: &'static str },

    #[error("{action} group variable failed")]
    UpstreamRejected { action: &'static str },
}

impl WorkflowError {
    pub fn missing_param(name: &str) -> Self {
        WorkflowError::InputInvalid(format!("Missing required param '{}'", name))
    }

    /// True for failures caused by the upstream rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            WorkflowError::UpstreamUnavailable { .. } | WorkflowError::UpstreamRejected { .. }
        )
    }
}

/// HTTP server errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },
}

/// Result type alias for application assembly (see `app`)
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for GitLab API operations
pub type GitLabResult<T> = std::result::Result<T, GitLabError>;

/// Result type alias for workflow operations
pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;
