//! Secret string type for safe token handling.

use serde::Deserialize;
use std::fmt;

/// A token that never prints its value.
///
/// `Debug` and `Display` both render `[REDACTED]`; `expose_secret()` is the
/// only way to read the value, which keeps tokens out of `tracing` fields
/// and error messages.
#[derive(Clone, Default)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// True if the secret is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_redacted() {
        let secret = SecretString::new("glpat-secret");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "glpat-secret");
    }

    #[test]
    fn test_is_blank() {
        assert!(SecretString::default().is_blank());
        assert!(SecretString::new(" \t").is_blank());
        assert!(!SecretString::new("x").is_blank());
    }

    #[test]
    fn test_deserialize() {
        let secret: SecretString = serde_json::from_str(r#""test-token""#).unwrap();
        assert_eq!(secret.expose_secret(), "test-token");
    }

    #[test]
    fn test_redacted_inside_struct_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Holder {
            token: SecretString,
        }
        let holder = Holder {
            token: "abc123".into(),
        };
        assert!(!format!("{:?}", holder).contains("abc123"));
    }
}
