//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (GITLAB_HELPER__*)
//! 2. Conventional GitLab variables (GITLAB_URL, GITLAB_TOKEN)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::Path;

/// Prefix of the application's own environment variables
pub const ENV_PREFIX: &str = "GITLAB_HELPER";

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "gitlab-helper.toml",
    ".gitlab-helper.toml",
    "~/.config/gitlab-helper/config.toml",
    "/etc/gitlab-helper/config.toml",
];

/// Conventional variables and the config key they feed
const CONVENTIONAL_ENV: &[(&str, &str)] = &[
    ("GITLAB_URL", "gitlab.url"),
    ("GITLAB_TOKEN", "gitlab.token"),
    ("GITLAB_PRIVATE_TOKEN", "gitlab.token"),
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    // Skip token validation for testing
    validate_config_relaxed(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    builder = apply_conventional_env(builder)?;

    // e.g., GITLAB_HELPER__GITLAB__URL, GITLAB_HELPER__SERVER__PORT
    // Double underscore (__) maps to nested keys (gitlab.url)
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Layer GITLAB_URL / GITLAB_TOKEN on top of the file.
///
/// Overrides would beat the prefixed variables too, so a key is skipped
/// when its GITLAB_HELPER__ form is set.
fn apply_conventional_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut applied: Vec<&str> = Vec::new();

    for (var, key) in CONVENTIONAL_ENV {
        if applied.contains(key) || prefixed_env_is_set(key) {
            continue;
        }
        if let Ok(value) = std::env::var(var)
            && !value.is_empty()
        {
            builder = builder
                .set_override(*key, value)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
            applied.push(*key);
        }
    }

    Ok(builder)
}

fn prefixed_env_is_set(key: &str) -> bool {
    let var = format!(
        "{}__{}",
        ENV_PREFIX,
        key.replace('.', "__").to_ascii_uppercase()
    );
    std::env::var_os(var).is_some()
}

/// Validate configuration values (relaxed - for testing without token)
fn validate_config_relaxed(config: &AppConfig) -> Result<(), ConfigError> {
    let gitlab = &config.gitlab;

    if gitlab.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "gitlab.url".to_string(),
        });
    }

    if !gitlab.url.starts_with("http://") && !gitlab.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "gitlab.url must start with http:// or https://, got: {}",
                gitlab.url
            ),
        });
    }

    if gitlab.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "gitlab.timeout_secs must be greater than 0".to_string(),
        });
    }

    if !(1..=100).contains(&gitlab.per_page) {
        return Err(ConfigError::Invalid {
            message: format!(
                "gitlab.per_page must be between 1 and 100, got: {}",
                gitlab.per_page
            ),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    Ok(())
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_config_relaxed(config)?;

    // The service token backs every membership and variable call
    match &config.gitlab.token {
        Some(token) if !token.is_blank() => Ok(()),
        _ => Err(ConfigError::Missing {
            field: "gitlab.token (set GITLAB_TOKEN environment variable)".to_string(),
        }),
    }
}
