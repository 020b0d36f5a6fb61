//! Route handlers
//!
//! Handlers only translate between HTTP and the workflow: they pull the
//! caller's token out of the `PRIVATE-TOKEN` header, hand the request to
//! [`VariableWorkflow`](crate::workflow::VariableWorkflow) and map the outcome.

use crate::auth::PRIVATE_TOKEN_HEADER;
use crate::server::AppState;
use crate::server::dto::{Group, Variable, VariableForm};
use crate::server::error::ApiError;
use crate::util::SecretString;
use crate::workflow::VariableInput;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Form, Json};
use serde_json::{Value, json};

/// Caller token from the request; a missing or non-ASCII header reads as blank
fn caller_token(headers: &HeaderMap) -> SecretString {
    headers
        .get(PRIVATE_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(SecretString::from)
        .unwrap_or_default()
}

fn form_input(form: Result<Form<VariableForm>, FormRejection>) -> Result<VariableInput, ApiError> {
    let Form(form) = form?;
    Ok(form.into())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /groups`
pub async fn list_groups(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Group>>, ApiError> {
    let token = caller_token(&headers);
    let groups = state.workflow.list_groups(&token).await?;
    Ok(Json(groups.into_iter().map(Group::from).collect()))
}

/// `GET /groups/{groupId}/variables`
pub async fn list_variables(
    State(state): State<AppState>,
    headers: HeaderMap,
    group_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<Variable>>, ApiError> {
    let Path(group_id) = group_id?;
    let token = caller_token(&headers);
    let variables = state.workflow.list_variables(&token, group_id).await?;
    Ok(Json(variables.into_iter().map(Variable::from).collect()))
}

/// `POST /groups/{groupId}/variables`
pub async fn create_variable(
    State(state): State<AppState>,
    headers: HeaderMap,
    group_id: Result<Path<u64>, PathRejection>,
    form: Result<Form<VariableForm>, FormRejection>,
) -> Result<Json<Variable>, ApiError> {
    let Path(group_id) = group_id?;
    let token = caller_token(&headers);
    let input = form_input(form)?;
    let created = state
        .workflow
        .create_variable(&token, group_id, input)
        .await?;
    Ok(Json(created.into()))
}

/// `PUT /groups/{groupId}/variables`
pub async fn update_variable(
    State(state): State<AppState>,
    headers: HeaderMap,
    group_id: Result<Path<u64>, PathRejection>,
    form: Result<Form<VariableForm>, FormRejection>,
) -> Result<Json<Variable>, ApiError> {
    let Path(group_id) = group_id?;
    let token = caller_token(&headers);
    let input = form_input(form)?;
    let updated = state
        .workflow
        .update_variable(&token, group_id, input)
        .await?;
    Ok(Json(updated.into()))
}

/// `DELETE /groups/{groupId}/variables/{key}`
pub async fn delete_variable(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<(u64, String)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((group_id, key)) = path?;
    let token = caller_token(&headers);
    state.workflow.delete_variable(&token, group_id, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
