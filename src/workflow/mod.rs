//! Authorization gate and variable workflow
//!
//! Every request runs the same pipeline, stopping at the first failing step:
//!
//! ```text
//! caller token → caller → (input checks) → memberships → group membership
//!              → access level ≥ MAINTAINER → fresh variable list → mutation
//! ```
//!
//! Nothing is cached between requests. Existence checks run against a list
//! fetched immediately before the mutation, so two concurrent writers of the
//! same key can both pass the check; GitLab remains the source of truth.

pub mod validation;

pub use validation::{MASKABLE_PATTERN, ValidVariable, VariableInput, is_maskable};

use crate::error::{WorkflowError, WorkflowResult};
use crate::gitlab::{AccessLevel, GroupVariable, GroupVariablesApi, Membership, User};
use crate::util::SecretString;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Minimum access level for creating, updating or deleting variables
pub const REQUIRED_WRITE_LEVEL: AccessLevel = AccessLevel::Maintainer;

/// Request-scoped pipeline over a [`GroupVariablesApi`]
#[derive(Clone)]
pub struct VariableWorkflow {
    api: Arc<dyn GroupVariablesApi>,
}

impl VariableWorkflow {
    pub fn new(api: Arc<dyn GroupVariablesApi>) -> Self {
        Self { api }
    }

    /// Groups the caller is a member of
    pub async fn list_groups(&self, token: &SecretString) -> WorkflowResult<Vec<Membership>> {
        let result = self.try_list_groups(token).await;
        log_rejection("list_groups", None, None, result)
    }

    /// Variables of a group the caller is a member of (any access level)
    pub async fn list_variables(
        &self,
        token: &SecretString,
        group_id: u64,
    ) -> WorkflowResult<Vec<GroupVariable>> {
        let result = self.try_list_variables(token, group_id).await;
        log_rejection("list_variables", Some(group_id), None, result)
    }

    /// Create a variable whose key does not exist yet
    pub async fn create_variable(
        &self,
        token: &SecretString,
        group_id: u64,
        input: VariableInput,
    ) -> WorkflowResult<GroupVariable> {
        let key = input.key.clone();
        let result = self.try_create(token, group_id, input).await;
        log_rejection("create_variable", Some(group_id), key.as_deref(), result)
    }

    /// Update an existing variable; unspecified settings are left unchanged
    pub async fn update_variable(
        &self,
        token: &SecretString,
        group_id: u64,
        input: VariableInput,
    ) -> WorkflowResult<GroupVariable> {
        let key = input.key.clone();
        let result = self.try_update(token, group_id, input).await;
        log_rejection("update_variable", Some(group_id), key.as_deref(), result)
    }

    /// Delete an existing variable
    pub async fn delete_variable(
        &self,
        token: &SecretString,
        group_id: u64,
        key: &str,
    ) -> WorkflowResult<()> {
        let result = self.try_delete(token, group_id, key).await;
        log_rejection("delete_variable", Some(group_id), Some(key), result)
    }

    async fn try_list_groups(&self, token: &SecretString) -> WorkflowResult<Vec<Membership>> {
        let user = self.resolve_caller(token).await?;
        info!(user = %user.username, "Retrieving groups");
        self.memberships(&user).await
    }

    async fn try_list_variables(
        &self,
        token: &SecretString,
        group_id: u64,
    ) -> WorkflowResult<Vec<GroupVariable>> {
        let user = self.resolve_caller(token).await?;
        info!(user = %user.username, group_id, "Retrieving group variables");
        self.group_membership(&user, group_id, None).await?;
        self.current_variables(group_id).await
    }

    async fn try_create(
        &self,
        token: &SecretString,
        group_id: u64,
        input: VariableInput,
    ) -> WorkflowResult<GroupVariable> {
        let user = self.resolve_caller(token).await?;
        info!(user = %user.username, group_id, key = ?input.key, "Creating group variable");
        let variable = input.validate()?;
        self.group_membership(&user, group_id, Some(REQUIRED_WRITE_LEVEL))
            .await?;

        if contains_key(&self.current_variables(group_id).await?, &variable.key) {
            return Err(WorkflowError::AlreadyExists { key: variable.key });
        }

        self.api
            .create_group_variable(group_id, &variable.key, &variable.value, &variable.settings)
            .await
            .ok_or(WorkflowError::UpstreamRejected { action: "Creating" })
    }

    async fn try_update(
        &self,
        token: &SecretString,
        group_id: u64,
        input: VariableInput,
    ) -> WorkflowResult<GroupVariable> {
        let user = self.resolve_caller(token).await?;
        info!(user = %user.username, group_id, key = ?input.key, "Updating group variable");
        let variable = input.validate()?;
        self.group_membership(&user, group_id, Some(REQUIRED_WRITE_LEVEL))
            .await?;

        if !contains_key(&self.current_variables(group_id).await?, &variable.key) {
            return Err(WorkflowError::NotFound { key: variable.key });
        }

        self.api
            .update_group_variable(group_id, &variable.key, &variable.value, &variable.settings)
            .await
            .ok_or(WorkflowError::UpstreamRejected { action: "Updating" })
    }

    async fn try_delete(&self, token: &SecretString, group_id: u64, key: &str) -> WorkflowResult<()> {
        let user = self.resolve_caller(token).await?;
        info!(user = %user.username, group_id, key, "Deleting group variable");
        let key = validation::validate_key(Some(key))?;
        self.group_membership(&user, group_id, Some(REQUIRED_WRITE_LEVEL))
            .await?;

        if !contains_key(&self.current_variables(group_id).await?, key) {
            return Err(WorkflowError::NotFound {
                key: key.to_string(),
            });
        }

        if self.api.delete_group_variable(group_id, key).await {
            Ok(())
        } else {
            Err(WorkflowError::UpstreamRejected { action: "Deleting" })
        }
    }

    async fn resolve_caller(&self, token: &SecretString) -> WorkflowResult<User> {
        if token.is_blank() {
            return Err(WorkflowError::Unauthenticated);
        }
        self.api
            .current_user(token)
            .await
            .ok_or(WorkflowError::Unauthenticated)
    }

    async fn memberships(&self, user: &User) -> WorkflowResult<Vec<Membership>> {
        self.api
            .group_memberships(user.id)
            .await
            .ok_or(WorkflowError::UpstreamUnavailable {
                what: "group memberships",
            })
    }

    /// The caller's membership in `group_id`, optionally at a minimum level
    async fn group_membership(
        &self,
        user: &User,
        group_id: u64,
        required: Option<AccessLevel>,
    ) -> WorkflowResult<Membership> {
        let membership = self
            .memberships(user)
            .await?
            .into_iter()
            .find(|m| m.source_id == group_id)
            .ok_or(WorkflowError::NotAMember { group_id })?;

        match required {
            Some(required) if !membership.access_level.at_least(required) => {
                Err(WorkflowError::InsufficientPermission {
                    group_id,
                    actual: membership.access_level,
                    required,
                })
            }
            _ => Ok(membership),
        }
    }

    async fn current_variables(&self, group_id: u64) -> WorkflowResult<Vec<GroupVariable>> {
        self.api
            .group_variables(group_id)
            .await
            .ok_or(WorkflowError::UpstreamUnavailable {
                what: "group variables",
            })
    }
}

fn contains_key(variables: &[GroupVariable], key: &str) -> bool {
    variables.iter().any(|v| v.key == key)
}

/// Log a failed outcome before it is handed back to the caller
fn log_rejection<T>(
    operation: &'static str,
    group_id: Option<u64>,
    key: Option<&str>,
    result: WorkflowResult<T>,
) -> WorkflowResult<T> {
    if let Err(e) = &result {
        if e.is_upstream() {
            error!(operation, group_id, key, error = %e, "Request failed upstream");
        } else {
            warn!(operation, group_id, key, error = %e, "Request rejected");
        }
    }
    result
}
