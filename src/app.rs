//! Application assembly
//!
//! Wires configuration into the client, service, workflow and router.

use crate::auth::create_auth_provider;
use crate::config::AppConfig;
use crate::error::Result;
use crate::gitlab::{GitLabClient, GitLabService};
use crate::server::{AppState, build_router};
use crate::transport::{HttpConfig, run_http};
use crate::workflow::VariableWorkflow;
use axum::Router;
use std::sync::Arc;
use tracing::info;

/// Build the router for `config`, failing if the service credential or client cannot be set up
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let auth = create_auth_provider(&config.gitlab)?;
    let client = GitLabClient::new(&config.gitlab, auth)?;
    info!(gitlab = %config.gitlab.api_url(), "GitLab client ready");

    let workflow = VariableWorkflow::new(Arc::new(GitLabService::new(client)));
    Ok(build_router(AppState::new(workflow)))
}

/// Build the application and serve it until Ctrl+C
pub async fn run(config: &AppConfig, http: HttpConfig) -> Result<()> {
    let router = build_app(config)?;
    run_http(router, http).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AuthError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn config_with_token(token: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.gitlab.token = Some(token.into());
        config
    }

    #[test]
    fn test_build_app_rejects_blank_service_token() {
        let err = build_app(&config_with_token("  ")).unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidToken)));
    }

    #[test]
    fn test_build_app_rejects_invalid_proxy() {
        let mut config = config_with_token("svc-token");
        config.gitlab.proxy = Some("http://[invalid".to_string());
        let err = build_app(&config).unwrap_err();
        assert!(matches!(err, AppError::GitLab(_)));
    }

    #[tokio::test]
    async fn test_build_app_serves_health() {
        let router = build_app(&config_with_token("svc-token")).unwrap();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_run_reports_bind_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken = HttpConfig::new(listener.local_addr().unwrap());

        let err = run(&config_with_token("svc-token"), taken).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
