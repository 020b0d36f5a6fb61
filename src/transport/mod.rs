//! Transport module
//!
//! Binds the HTTP listener and serves the application router on it.

pub mod http;

pub use http::{DEFAULT_HTTP_PORT, HttpConfig, run_http, serve_until};
