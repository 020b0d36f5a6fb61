//! GitLab API module
//!
//! Access levels, the paginated REST client, and the group variable
//! operations built on top of it.

pub mod access;
pub mod client;
pub mod pagination;
pub mod service;
pub mod types;

pub use access::AccessLevel;
pub use client::{ApiCall, Credential, GitLabClient};
pub use service::{GitLabService, GroupVariablesApi};
pub use types::*;
