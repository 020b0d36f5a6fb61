//! Configuration loading tests

use gitlab_helper::config::{LogFormat, load_config, load_config_from_str};
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

const FULL_CONFIG: &str = r#"
[gitlab]
url = "https://gitlab.company.com"
api_path = "/gitlab/api/v4"
token = "glpat-test"
per_page = 20
timeout_secs = 60
verify_ssl = false
proxy = "http://proxy.company.com:3128"

[server]
host = "0.0.0.0"
port = 9000

[logging]
level = "debug"
format = "json"
"#;

/// Write `content` to a config file in a fresh temp dir
fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gitlab-helper.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn clear_env() {
    unsafe {
        for var in [
            "GITLAB_URL",
            "GITLAB_TOKEN",
            "GITLAB_PRIVATE_TOKEN",
            "GITLAB_HELPER__GITLAB__URL",
            "GITLAB_HELPER__GITLAB__TOKEN",
            "GITLAB_HELPER__SERVER__PORT",
        ] {
            env::remove_var(var);
        }
    }
}

fn token(config: &gitlab_helper::AppConfig) -> Option<&str> {
    config.gitlab.token.as_ref().map(|t| t.expose_secret())
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    // GitLab
    assert_eq!(config.gitlab.url, "https://gitlab.company.com");
    assert_eq!(
        config.gitlab.api_url(),
        "https://gitlab.company.com/gitlab/api/v4"
    );
    assert_eq!(token(&config), Some("glpat-test"));
    assert_eq!(config.gitlab.per_page, 20);
    assert_eq!(config.gitlab.timeout_secs, 60);
    assert!(!config.gitlab.verify_ssl);
    assert_eq!(
        config.gitlab.proxy.as_deref(),
        Some("http://proxy.company.com:3128")
    );

    // Server
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);

    // Logging
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = load_config_from_str("").unwrap();

    assert_eq!(config.gitlab.api_url(), "https://gitlab.com/api/v4");
    assert_eq!(config.gitlab.per_page, 100);
    assert!(config.gitlab.verify_ssl);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_token_is_redacted_in_debug() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("glpat-test"));
}

#[test]
fn test_invalid_log_format() {
    let config_str = r#"
[logging]
format = "xml"
"#;
    assert!(load_config_from_str(config_str).is_err());
}

#[test]
fn test_zero_timeout_rejected() {
    let config_str = r#"
[gitlab]
timeout_secs = 0
"#;
    assert!(load_config_from_str(config_str).is_err());
}

#[test]
#[serial_test::serial]
fn test_missing_file_is_an_error() {
    clear_env();
    let result = load_config(Some("/nonexistent/gitlab-helper.toml"));
    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn test_strict_load_requires_token() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
[gitlab]
url = "https://gitlab.example.com"
"#,
    );

    let result = load_config(Some(path.to_str().unwrap()));
    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn test_env_var_gitlab_token_fallback() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
[gitlab]
url = "https://gitlab.example.com"
"#,
    );

    unsafe {
        env::set_var("GITLAB_TOKEN", "gitlab-fallback-token");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(token(&config), Some("gitlab-fallback-token"));

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_env_var_private_token_fallback() {
    clear_env();
    let (_dir, path) = write_config("");

    unsafe {
        env::set_var("GITLAB_PRIVATE_TOKEN", "private-fallback-token");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(token(&config), Some("private-fallback-token"));

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_env_var_gitlab_token_overrides_file() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
[gitlab]
token = "file-token"
"#,
    );

    unsafe {
        env::set_var("GITLAB_TOKEN", "env-token");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(token(&config), Some("env-token"));

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_env_var_priority_prefixed_over_gitlab_token() {
    clear_env();
    let (_dir, path) = write_config("");

    unsafe {
        env::set_var("GITLAB_HELPER__GITLAB__TOKEN", "helper-priority-token");
        env::set_var("GITLAB_TOKEN", "gitlab-fallback-token");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(token(&config), Some("helper-priority-token"));

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_env_var_priority_prefixed_over_gitlab_url() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
[gitlab]
token = "test-token"
"#,
    );

    unsafe {
        env::set_var(
            "GITLAB_HELPER__GITLAB__URL",
            "https://helper-priority.gitlab.com",
        );
        env::set_var("GITLAB_URL", "https://fallback.gitlab.com");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(config.gitlab.url, "https://helper-priority.gitlab.com");

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_env_var_gitlab_url_fallback() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
[gitlab]
token = "test-token"
"#,
    );

    unsafe {
        env::set_var("GITLAB_URL", "https://fallback.gitlab.com");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(config.gitlab.url, "https://fallback.gitlab.com");

    clear_env();
}

#[test]
#[serial_test::serial]
fn test_env_var_server_port() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
[gitlab]
token = "test-token"

[server]
port = 9000
"#,
    );

    unsafe {
        env::set_var("GITLAB_HELPER__SERVER__PORT", "9191");
    }

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(config.server.port, 9191);

    clear_env();
}
