//! Authentication provider trait
//!
//! The service credential used for membership, variable listing and variable
//! writes is supplied by an [`AuthProvider`] handed to the client at
//! construction time.

use crate::error::AuthError;
use crate::util::SecretString;
// async_trait required for dyn-compatibility with Box<dyn AuthProvider>
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, InvalidHeaderValue};

/// Name of GitLab's personal access token header
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Source of the credential attached to upstream requests
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get the header to attach to the next request
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError>;

    /// Get a description of the auth method (for logging)
    fn auth_type(&self) -> &'static str;
}

/// Authentication header to use with requests
#[derive(Debug, Clone)]
pub struct AuthHeader {
    token: SecretString,
}

impl AuthHeader {
    /// `PRIVATE-TOKEN: <token>`
    pub fn private_token(token: SecretString) -> Self {
        Self { token }
    }

    pub fn header_name(&self) -> HeaderName {
        HeaderName::from_static("private-token")
    }

    /// Header value, flagged sensitive so it never shows up in debug output
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(self.token.expose_secret())?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Box type alias for auth providers
pub type BoxedAuthProvider = Box<dyn AuthProvider>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_token_header() {
        let header = AuthHeader::private_token(SecretString::new("glpat-abc"));
        assert_eq!(header.header_name().as_str(), "private-token");
        assert!(
            header
                .header_name()
                .as_str()
                .eq_ignore_ascii_case(PRIVATE_TOKEN_HEADER)
        );

        let value = header.header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "glpat-abc");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let header = AuthHeader::private_token(SecretString::new("glpat-abc"));
        assert!(!format!("{:?}", header).contains("glpat-abc"));
    }

    #[test]
    fn test_invalid_header_value() {
        let header = AuthHeader::private_token(SecretString::new("bad\ntoken"));
        assert!(header.header_value().is_err());
    }
}
