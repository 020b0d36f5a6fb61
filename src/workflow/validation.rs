//! Input checks for variable writes
//!
//! These run before any membership lookup and depend only on the request.

use crate::error::{WorkflowError, WorkflowResult};
use crate::gitlab::VariableSettings;
use regex::Regex;
use std::sync::LazyLock;

/// GitLab's constraint on values of masked CI/CD variables
pub const MASKABLE_PATTERN: &str = "^[A-Za-z0-9@:.~]{8,}$";

static MASKABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MASKABLE_PATTERN).expect("maskable pattern is a valid regex"));

/// Can `value` be stored in a masked variable?
pub fn is_maskable(value: &str) -> bool {
    MASKABLE.is_match(value)
}

fn has_text(s: Option<&str>) -> bool {
    s.is_some_and(|s| !s.trim().is_empty())
}

/// A create or update request as received from the caller
#[derive(Debug, Clone, Default)]
pub struct VariableInput {
    pub key: Option<String>,
    pub value: Option<String>,
    pub settings: VariableSettings,
}

/// A variable write that passed input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVariable {
    pub key: String,
    pub value: String,
    pub settings: VariableSettings,
}

impl VariableInput {
    /// Require key and value, and a maskable value when masking is requested
    pub fn validate(self) -> WorkflowResult<ValidVariable> {
        let key = validate_key(self.key.as_deref())?.to_string();

        let value = match self.value {
            Some(value) if has_text(Some(&value)) => value,
            _ => return Err(WorkflowError::missing_param("value")),
        };

        if self.settings.masked == Some(true) && !is_maskable(&value) {
            return Err(WorkflowError::NotMaskable {
                pattern: MASKABLE_PATTERN,
            });
        }

        Ok(ValidVariable {
            key,
            value,
            settings: self.settings,
        })
    }
}

/// Require a non-blank variable key
pub fn validate_key(key: Option<&str>) -> WorkflowResult<&str> {
    match key {
        Some(key) if has_text(Some(key)) => Ok(key),
        _ => Err(WorkflowError::missing_param("key")),
    }
}
