//! Authentication module
//!
//! Two credentials are in play: the service's own Personal Access Token,
//! configured once and used for membership and variable calls, and the
//! caller's token, used only to resolve who the caller is.

pub mod provider;
pub mod token;

pub use provider::{AuthHeader, AuthProvider, BoxedAuthProvider, PRIVATE_TOKEN_HEADER};
pub use token::PatProvider;

use crate::config::GitLabConfig;
use crate::error::AuthError;

/// Create an auth provider from configuration
pub fn create_auth_provider(config: &GitLabConfig) -> Result<BoxedAuthProvider, AuthError> {
    if let Some(token) = &config.token {
        Ok(Box::new(PatProvider::new(token.clone())?))
    } else {
        // Try environment variables
        Ok(Box::new(PatProvider::from_env()?))
    }
}
