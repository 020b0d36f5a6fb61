//! HTTP surface
//!
//! Routes:
//! - `GET    /health`
//! - `GET    /groups`
//! - `GET    /groups/{groupId}/variables`
//! - `POST   /groups/{groupId}/variables`
//! - `PUT    /groups/{groupId}/variables`
//! - `DELETE /groups/{groupId}/variables/{key}`

pub mod dto;
pub mod error;
pub mod handler;

pub use dto::{ErrorBody, Group, Variable, VariableForm};
pub use error::ApiError;

use crate::workflow::VariableWorkflow;
use axum::Router;
use axum::routing::{delete, get};
use tower_http::trace::TraceLayer;

/// Shared state for route handlers
#[derive(Clone)]
pub struct AppState {
    pub workflow: VariableWorkflow,
}

impl AppState {
    pub fn new(workflow: VariableWorkflow) -> Self {
        Self { workflow }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .route("/groups", get(handler::list_groups))
        .route(
            "/groups/{group_id}/variables",
            get(handler::list_variables)
                .post(handler::create_variable)
                .put(handler::update_variable),
        )
        .route(
            "/groups/{group_id}/variables/{key}",
            delete(handler::delete_variable),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
