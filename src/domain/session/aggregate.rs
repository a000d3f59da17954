//! Analysis session aggregate.
//!
//! One session spans a single dilemma from setup to reset. It owns the
//! preference state and the most recent comparison result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PreferenceState;
use crate::domain::decision::{ComparisonResponse, ParameterValue, UserPreferences};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Where the session is in its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Parameters synthesized, no analysis yet.
    Setup,
    /// At least one comparison has succeeded.
    Reviewing,
}

/// Session aggregate.
///
/// # Invariants
///
/// - `result` is only ever replaced wholesale by a successful comparison
/// - `phase` is `Reviewing` iff `result` is present
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    id: SessionId,
    state: PreferenceState,
    suggested_priorities: Vec<String>,
    result: Option<ComparisonResponse>,
    phase: SessionPhase,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AnalysisSession {
    /// Starts a session from freshly synthesized preferences.
    pub fn new(
        id: SessionId,
        preferences: UserPreferences,
        suggested_priorities: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: PreferenceState::new(preferences),
            suggested_priorities,
            result: None,
            phase: SessionPhase::Setup,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn suggested_priorities(&self) -> &[String] {
        &self.suggested_priorities
    }

    pub fn result(&self) -> Option<&ComparisonResponse> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edits
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_param(&mut self, id: &str, value: ParameterValue) -> Result<(), DomainError> {
        self.state.set_param(id, value)?;
        self.touch();
        Ok(())
    }

    pub fn set_priorities(&mut self, priorities: Vec<String>) -> Result<(), DomainError> {
        self.state.set_priorities(priorities)?;
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Analysis
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the preferences to submit for comparison.
    ///
    /// The first analysis is always allowed. Later ones need the working
    /// copy to differ from the baseline.
    ///
    /// # Errors
    ///
    /// - `NoChanges` when a result exists and nothing was edited since
    pub fn begin_analysis(&self) -> Result<UserPreferences, DomainError> {
        if self.result.is_some() && !self.state.has_changes() {
            return Err(DomainError::new(
                ErrorCode::NoChanges,
                "No preference changes since the last analysis",
            ));
        }
        Ok(self.state.working().clone())
    }

    /// Records a successful comparison for `submitted`.
    pub fn complete_analysis(&mut self, submitted: UserPreferences, result: ComparisonResponse) {
        self.state.commit(submitted);
        self.result = Some(result);
        self.phase = SessionPhase::Reviewing;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{DecisionCategory, DynamicParameter};
    use serde_json::json;

    fn session() -> AnalysisSession {
        let prefs = UserPreferences::new(
            "Move to Berlin for a new job?",
            DecisionCategory::Career,
            vec![DynamicParameter::slider("salary", "Salary", 0.0, 200.0, 100.0)],
            vec![],
        )
        .unwrap();
        AnalysisSession::new(SessionId::new(), prefs, vec!["Growth".to_string()])
    }

    fn response() -> ComparisonResponse {
        ComparisonResponse::from_extracted(&json!({"options": [{"name": "Stay"}]}))
    }

    #[test]
    fn new_session_is_in_setup() {
        let s = session();
        assert_eq!(s.phase(), SessionPhase::Setup);
        assert!(s.result().is_none());
        assert_eq!(s.suggested_priorities(), ["Growth".to_string()]);
    }

    #[test]
    fn first_analysis_allowed_without_changes() {
        assert!(session().begin_analysis().is_ok());
    }

    #[test]
    fn repeat_analysis_without_changes_is_rejected() {
        let mut s = session();
        let submitted = s.begin_analysis().unwrap();
        s.complete_analysis(submitted, response());

        let err = s.begin_analysis().unwrap_err();
        assert_eq!(err.code, ErrorCode::NoChanges);
    }

    #[test]
    fn repeat_analysis_after_edit_is_allowed() {
        let mut s = session();
        let submitted = s.begin_analysis().unwrap();
        s.complete_analysis(submitted, response());
        s.set_param("salary", ParameterValue::Number(120.0)).unwrap();

        let next = s.begin_analysis().unwrap();
        assert_eq!(
            next.param("salary").unwrap().value(),
            ParameterValue::Number(120.0)
        );
    }

    #[test]
    fn complete_analysis_moves_to_reviewing() {
        let mut s = session();
        let submitted = s.begin_analysis().unwrap();
        s.complete_analysis(submitted, response());

        assert_eq!(s.phase(), SessionPhase::Reviewing);
        assert_eq!(s.result().unwrap().options[0].name, "Stay");
        assert!(!s.state().has_changes());
    }

    #[test]
    fn edits_touch_updated_at() {
        let mut s = session();
        let before = s.updated_at();
        s.set_param("salary", ParameterValue::Number(10.0)).unwrap();
        assert!(s.updated_at() >= before);
        assert!(s.updated_at() >= s.created_at());
    }
}
