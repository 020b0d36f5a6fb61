//! Group variable operations
//!
//! Each method maps onto exactly one upstream resource operation. Results
//! follow the client's contract: `None` / `false` means the call failed and
//! the failure has already been logged.

use crate::gitlab::client::{ApiCall, Credential, GitLabClient};
use crate::gitlab::types::{GroupVariable, Membership, User, VariableSettings};
use crate::util::SecretString;
// async_trait needed so the workflow can hold an `Arc<dyn GroupVariablesApi>`
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

/// Upstream operations the variable workflow depends on
#[async_trait]
pub trait GroupVariablesApi: Send + Sync {
    /// The user owning `token`
    async fn current_user(&self, token: &SecretString) -> Option<User>;

    /// The user's group (namespace) memberships
    async fn group_memberships(&self, user_id: u64) -> Option<Vec<Membership>>;

    async fn group_variables(&self, group_id: u64) -> Option<Vec<GroupVariable>>;

    async fn create_group_variable(
        &self,
        group_id: u64,
        key: &str,
        value: &str,
        settings: &VariableSettings,
    ) -> Option<GroupVariable>;

    async fn update_group_variable(
        &self,
        group_id: u64,
        key: &str,
        value: &str,
        settings: &VariableSettings,
    ) -> Option<GroupVariable>;

    async fn delete_group_variable(&self, group_id: u64, key: &str) -> bool;
}

/// [`GroupVariablesApi`] backed by the GitLab REST API
pub struct GitLabService {
    client: GitLabClient,
}

impl GitLabService {
    pub fn new(client: GitLabClient) -> Self {
        Self { client }
    }
}

/// Form body for a variable write; `key` is omitted when it travels in the path
fn variable_form(
    key: Option<&str>,
    value: &str,
    settings: &VariableSettings,
) -> Vec<(&'static str, String)> {
    let mut form = Vec::with_capacity(6);
    if let Some(key) = key {
        form.push(("key", key.to_string()));
    }
    form.push(("value", value.to_string()));
    form.extend(settings.to_form());
    form
}

#[async_trait]
impl GroupVariablesApi for GitLabService {
    async fn current_user(&self, token: &SecretString) -> Option<User> {
        if token.is_blank() {
            warn!("Refusing to look up a user without a personal access token");
            return None;
        }
        debug!("Retrieving user for caller token");
        // An unknown or revoked token is an expected outcome, not an upstream fault
        self.client
            .read(
                &ApiCall::new("/user"),
                Credential::Caller(token),
                &[StatusCode::UNAUTHORIZED],
            )
            .await
    }

    async fn group_memberships(&self, user_id: u64) -> Option<Vec<Membership>> {
        debug!(user_id, "Retrieving group memberships");
        let call = ApiCall::new("/users/{userId}/memberships")
            .var("userId", user_id)
            .query("type", "Namespace");
        self.client.read_list(&call, Credential::Service, &[]).await
    }

    async fn group_variables(&self, group_id: u64) -> Option<Vec<GroupVariable>> {
        debug!(group_id, "Retrieving group variables");
        let call = ApiCall::new("/groups/{groupId}/variables").var("groupId", group_id);
        self.client.read_list(&call, Credential::Service, &[]).await
    }

    async fn create_group_variable(
        &self,
        group_id: u64,
        key: &str,
        value: &str,
        settings: &VariableSettings,
    ) -> Option<GroupVariable> {
        debug!(group_id, key, "Creating group variable");
        let call = ApiCall::new("/groups/{groupId}/variables").var("groupId", group_id);
        let form = variable_form(Some(key), value, settings);
        self.client.write(Method::POST, &call, &form, &[]).await
    }

    async fn update_group_variable(
        &self,
        group_id: u64,
        key: &str,
        value: &str,
        settings: &VariableSettings,
    ) -> Option<GroupVariable> {
        debug!(group_id, key, "Updating group variable");
        let call = ApiCall::new("/groups/{groupId}/variables/{key}")
            .var("groupId", group_id)
            .var("key", key);
        let form = variable_form(None, value, settings);
        self.client.write(Method::PUT, &call, &form, &[]).await
    }

    async fn delete_group_variable(&self, group_id: u64, key: &str) -> bool {
        debug!(group_id, key, "Deleting group variable");
        let call = ApiCall::new("/groups/{groupId}/variables/{key}")
            .var("groupId", group_id)
            .var("key", key);
        self.client
            .write_no_content(Method::DELETE, &call, &[])
            .await
    }
}
