//! GitLab API response types
//!
//! Only the fields this service reads are modelled; unknown fields are ignored.

use crate::gitlab::AccessLevel;
use serde::{Deserialize, Serialize};

/// The user a personal access token belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// A user's membership in a group (namespace) or project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub source_id: u64,
    pub source_name: String,
    pub source_type: String,
    pub access_level: AccessLevel,
}

impl PartialEq for Membership {
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id
    }
}

impl Eq for Membership {}

/// A CI/CD variable defined on a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupVariable {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_variable_type")]
    pub variable_type: String,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub masked: bool,
    #[serde(default = "default_environment_scope")]
    pub environment_scope: String,
}

fn default_variable_type() -> String {
    "env_var".to_string()
}

fn default_environment_scope() -> String {
    "*".to_string()
}

impl PartialEq for GroupVariable {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for GroupVariable {}

/// Optional attributes of a variable write
///
/// Only the fields that are `Some` are sent upstream, so an update leaves
/// every unspecified attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSettings {
    pub variable_type: Option<String>,
    pub protected: Option<bool>,
    pub masked: Option<bool>,
    pub environment_scope: Option<String>,
}

impl VariableSettings {
    /// Form fields for the provided settings, in a stable order
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();
        if let Some(variable_type) = &self.variable_type {
            form.push(("variable_type", variable_type.clone()));
        }
        if let Some(protected) = self.protected {
            form.push(("protected", protected.to_string()));
        }
        if let Some(masked) = self.masked {
            form.push(("masked", masked.to_string()));
        }
        if let Some(scope) = &self.environment_scope {
            form.push(("environment_scope", scope.clone()));
        }
        form
    }
}
