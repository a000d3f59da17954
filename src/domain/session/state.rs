//! Working copy vs. committed baseline.

use serde::Serialize;

use crate::domain::decision::{ParameterValue, UserPreferences};
use crate::domain::foundation::DomainError;

/// Tracks the preferences being edited against the last submitted set.
///
/// # Invariants
///
/// - Edits only ever touch `working`; `committed` changes only via `commit`
/// - `has_changes()` is a pure function of the two snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceState {
    committed: UserPreferences,
    working: UserPreferences,
}

impl PreferenceState {
    /// Seeds the working copy from `initial`.
    pub fn new(initial: UserPreferences) -> Self {
        Self {
            working: initial.clone(),
            committed: initial,
        }
    }

    pub fn working(&self) -> &UserPreferences {
        &self.working
    }

    pub fn committed(&self) -> &UserPreferences {
        &self.committed
    }

    /// Replaces the working copy with one where only `id` changed.
    ///
    /// # Errors
    ///
    /// - `ParameterNotFound` if the id is unknown
    /// - a validation code if the value does not fit the parameter
    pub fn set_param(&mut self, id: &str, value: ParameterValue) -> Result<(), DomainError> {
        self.working = self.working.with_param(id, value)?;
        Ok(())
    }

    /// Replaces the working copy's priority list.
    pub fn set_priorities(&mut self, priorities: Vec<String>) -> Result<(), DomainError> {
        self.working = self.working.with_priorities(priorities)?;
        Ok(())
    }

    /// True when the working copy differs from the baseline.
    pub fn has_changes(&self) -> bool {
        self.working.fingerprint() != self.committed.fingerprint()
    }

    /// Whether an update may be fired right now.
    pub fn can_refresh(&self, is_refreshing: bool) -> bool {
        self.has_changes() && !is_refreshing
    }

    /// Makes `submitted` the new baseline.
    ///
    /// Edits made to the working copy after submission are kept, so they
    /// still show as changes against the new baseline.
    pub fn commit(&mut self, submitted: UserPreferences) {
        self.committed = submitted;
    }
}
