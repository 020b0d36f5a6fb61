//! Configuration types for gitlab-helper
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitLab connection settings
    pub gitlab: GitLabConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// GitLab connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// GitLab instance URL (e.g., `https://gitlab.com`)
    pub url: String,

    /// API path prefix appended to `url`
    pub api_path: String,

    /// Service Personal Access Token (prefer env var GITLAB_TOKEN)
    ///
    /// Used for membership lookups and variable reads/writes. The caller's
    /// own token is only used to identify the caller.
    pub token: Option<SecretString>,

    /// Page size requested from list endpoints (1..=100)
    pub per_page: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,

    /// Optional HTTP(S) proxy for upstream calls
    pub proxy: Option<String>,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            api_path: "/api/v4".to_string(),
            token: None,
            per_page: 100,
            timeout_secs: 30,
            verify_ssl: true,
            proxy: None,
        }
    }
}

impl GitLabConfig {
    /// Get the full API base URL
    pub fn api_url(&self) -> String {
        let path = self.api_path.trim_matches('/');
        let base = self.url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host: an IP literal or a name resolved at startup
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

impl LogFormat {
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitlab_config_api_url() {
        let config = GitLabConfig {
            url: "https://gitlab.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://gitlab.example.com/api/v4");

        // Test with trailing slash
        let config = GitLabConfig {
            url: "https://gitlab.example.com/".to_string(),
            api_path: "api/v4/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://gitlab.example.com/api/v4");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.gitlab.url, "https://gitlab.com");
        assert_eq!(config.gitlab.per_page, 100);
        assert_eq!(config.gitlab.timeout_secs, 30);
        assert!(config.gitlab.token.is_none());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(LogFormat::try_parse("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::try_parse("xml"), None);
    }
}
