//! GitLab Helper
//!
//! Serves the group variable API over HTTP.

use clap::Parser;
use gitlab_helper::{
    config::{LogFormat, load_config},
    run,
    transport::HttpConfig,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// GitLab Helper - manage GitLab group CI/CD variables on behalf of group members
#[derive(Parser, Debug)]
#[command(name = "gitlab-helper")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "GITLAB_HELPER_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GITLAB_HELPER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, env = "GITLAB_HELPER_LOG_FORMAT")]
    log_format: Option<String>,

    /// HTTP server host
    #[arg(long, env = "GITLAB_HELPER_HOST")]
    host: Option<String>,

    /// HTTP server port
    #[arg(long, env = "GITLAB_HELPER_PORT")]
    port: Option<u16>,
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration; logging is configured from it, so errors here go to stderr directly
    let config = load_config(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = match args.log_format.as_deref() {
        Some(name) => LogFormat::try_parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown log format '{}'", name))?,
        None => config.logging.format,
    };
    init_logging(level, format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        gitlab = %config.gitlab.url,
        "Starting GitLab helper"
    );

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let http_config = HttpConfig::resolve(&host, port)
        .await
        .inspect_err(|e| error!(error = %e, "Invalid HTTP bind address"))?;

    run(&config, http_config)
        .await
        .inspect_err(|e| error!(error = %e, "Server failed"))?;

    info!("Shutting down");
    Ok(())
}
