//! Request and response bodies of the HTTP surface

use crate::gitlab::{AccessLevel, GroupVariable, Membership, VariableSettings};
use crate::workflow::VariableInput;
use serde::{Deserialize, Serialize};

/// A group the caller belongs to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub access_level: AccessLevel,
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl From<Membership> for Group {
    fn from(membership: Membership) -> Self {
        Self {
            id: membership.source_id,
            name: membership.source_name,
            access_level: membership.access_level,
        }
    }
}

/// A group CI/CD variable as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub key: String,
    pub value: String,
    pub variable_type: String,
    pub protected: bool,
    pub masked: bool,
    pub environment_scope: String,
}

impl From<GroupVariable> for Variable {
    fn from(v: GroupVariable) -> Self {
        Self {
            key: v.key,
            value: v.value,
            variable_type: v.variable_type,
            protected: v.protected,
            masked: v.masked,
            environment_scope: v.environment_scope,
        }
    }
}

/// Form body of `POST` and `PUT /groups/{groupId}/variables`
///
/// Every field is optional here so that a missing key or value is reported
/// by the workflow as a 400, not by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableForm {
    pub key: Option<String>,
    pub value: Option<String>,
    pub variable_type: Option<String>,
    #[serde(alias = "isProtected")]
    pub protected: Option<bool>,
    #[serde(alias = "isMasked")]
    pub masked: Option<bool>,
    pub environment_scope: Option<String>,
}

impl From<VariableForm> for VariableInput {
    fn from(form: VariableForm) -> Self {
        Self {
            key: form.key,
            value: form.value,
            settings: VariableSettings {
                variable_type: form.variable_type,
                protected: form.protected,
                masked: form.masked,
                environment_scope: form.environment_scope,
            },
        }
    }
}

/// Uniform error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}
