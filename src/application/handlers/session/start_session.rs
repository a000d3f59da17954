//! StartSessionHandler - Command handler for setting up a new analysis.

use std::sync::Arc;

use crate::domain::decision::{DecisionCategory, UserPreferences, MAX_PRIORITIES};
use crate::domain::foundation::{DomainError, SessionId, ValidationError};
use crate::domain::session::AnalysisSession;
use crate::ports::{ParameterSynthesizer, SessionRepository};

/// Command to start a session from a dilemma.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub category: DecisionCategory,
    pub problem_statement: String,
}

/// Handler for starting sessions.
pub struct StartSessionHandler {
    synthesizer: Arc<dyn ParameterSynthesizer>,
    repository: Arc<dyn SessionRepository>,
}

impl StartSessionHandler {
    pub fn new(
        synthesizer: Arc<dyn ParameterSynthesizer>,
        repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            synthesizer,
            repository,
        }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<AnalysisSession, DomainError> {
        // 1. Reject blank statements before spending a provider call
        let statement = cmd.problem_statement.trim();
        if statement.is_empty() {
            return Err(ValidationError::empty_field("problem_statement").into());
        }

        // 2. Synthesize parameters (never fails; falls back)
        let suggestions = self.synthesizer.synthesize(cmd.category, statement).await;

        // 3. Seed preferences, with suggested priorities as the initial picks
        let priorities = suggestions
            .suggested_priorities
            .iter()
            .take(MAX_PRIORITIES)
            .cloned()
            .collect();
        let preferences =
            UserPreferences::new(statement, cmd.category, suggestions.parameters, priorities)?;

        // 4. Persist
        let session = AnalysisSession::new(
            SessionId::new(),
            preferences,
            suggestions.suggested_priorities,
        );
        self.repository.save(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            category = %cmd.category,
            parameters = session.state().working().dynamic_params.len(),
            "Session started"
        );

        Ok(session)
    }
}
