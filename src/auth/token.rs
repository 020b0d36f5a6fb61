//! Personal Access Token authentication
//!
//! The service's own GitLab Personal Access Token.

use crate::auth::provider::{AuthHeader, AuthProvider};
use crate::error::AuthError;
use crate::util::SecretString;
use async_trait::async_trait;

/// Personal Access Token authentication provider
#[derive(Debug, Clone)]
pub struct PatProvider {
    token: SecretString,
}

impl PatProvider {
    /// Create a new PAT provider
    pub fn new(token: impl Into<SecretString>) -> Result<Self, AuthError> {
        let token = token.into();

        if token.is_blank() {
            return Err(AuthError::InvalidToken);
        }

        Ok(Self { token })
    }

    /// Create from environment variable
    ///
    /// Checks GITLAB_TOKEN and GITLAB_PRIVATE_TOKEN in order of precedence.
    pub fn from_env() -> Result<Self, AuthError> {
        for var in &["GITLAB_TOKEN", "GITLAB_PRIVATE_TOKEN"] {
            if let Ok(token) = std::env::var(var)
                && !token.is_empty()
            {
                return Self::new(token);
            }
        }

        Err(AuthError::NotConfigured)
    }
}

#[async_trait]
impl AuthProvider for PatProvider {
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError> {
        Ok(AuthHeader::private_token(self.token.clone()))
    }

    fn auth_type(&self) -> &'static str {
        "Personal Access Token"
    }
}
