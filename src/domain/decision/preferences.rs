//! User preferences submitted for comparison.

use serde::{Deserialize, Serialize};

use super::{DecisionCategory, DynamicParameter, ParameterValue};
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Maximum number of priority labels accepted from a user.
pub const MAX_PRIORITIES: usize = 10;

/// Everything the comparator needs to know about the user's dilemma.
///
/// Updates never mutate in place: each edit returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub problem_statement: String,
    pub category: DecisionCategory,
    pub dynamic_params: Vec<DynamicParameter>,
    pub priorities: Vec<String>,
}

impl UserPreferences {
    /// Creates preferences for a new session.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the problem statement is blank.
    pub fn new(
        problem_statement: impl Into<String>,
        category: DecisionCategory,
        dynamic_params: Vec<DynamicParameter>,
        priorities: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let problem_statement = problem_statement.into().trim().to_string();
        if problem_statement.is_empty() {
            return Err(ValidationError::empty_field("problem_statement"));
        }

        Ok(Self {
            problem_statement,
            category,
            dynamic_params,
            priorities: normalize_priorities(priorities)?,
        })
    }

    /// Looks up a parameter by id.
    pub fn param(&self, id: &str) -> Option<&DynamicParameter> {
        self.dynamic_params.iter().find(|p| p.id == id)
    }

    /// Returns a copy with exactly the parameter `id` carrying `value`.
    ///
    /// # Errors
    ///
    /// - `ParameterNotFound` if no parameter has that id
    /// - the parameter's validation error if the value is rejected
    pub fn with_param(&self, id: &str, value: ParameterValue) -> Result<Self, DomainError> {
        let index = self
            .dynamic_params
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ParameterNotFound,
                    format!("Parameter '{}' not found", id),
                )
            })?;

        let updated = self.dynamic_params[index].with_value(value)?;

        let dynamic_params = self
            .dynamic_params
            .iter()
            .enumerate()
            .map(|(i, p)| if i == index { updated.clone() } else { p.clone() })
            .collect();

        Ok(Self {
            dynamic_params,
            ..self.clone()
        })
    }

    /// Returns a copy with the given priority list.
    pub fn with_priorities(&self, priorities: Vec<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            priorities: normalize_priorities(priorities)?,
            ..self.clone()
        })
    }

    /// Canonical serialized form used for change detection.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Trims labels and drops blanks and duplicates, keeping order.
fn normalize_priorities(priorities: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut normalized: Vec<String> = Vec::with_capacity(priorities.len());
    for priority in priorities {
        let priority = priority.trim().to_string();
        if !priority.is_empty() && !normalized.contains(&priority) {
            normalized.push(priority);
        }
    }

    if normalized.len() > MAX_PRIORITIES {
        return Err(ValidationError::invalid_format(
            "priorities",
            format!("at most {} priorities are allowed", MAX_PRIORITIES),
        ));
    }

    Ok(normalized)
}
