//! GitLab Helper
//!
//! An HTTP service that lets members of a GitLab group manage the group's
//! CI/CD variables with their own personal access token, while the actual
//! writes are performed with a service token.
//!
//! ## Authorization Model
//!
//! ```text
//! PRIVATE-TOKEN → user → group memberships → access level → operation
//! ```
//!
//! - Listing groups and variables requires membership in the group
//! - Creating, updating and deleting variables requires `MAINTAINER` or above
//!
//! ## Example Configuration
//!
//! ```toml
//! [gitlab]
//! url = "https://gitlab.example.com"
//! # service token from GITLAB_TOKEN env var
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod server;
pub mod transport;
pub mod util;
pub mod workflow;

// Re-export main types
pub use app::{build_app, run};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result, WorkflowError};
pub use server::{AppState, build_router};
pub use workflow::VariableWorkflow;
