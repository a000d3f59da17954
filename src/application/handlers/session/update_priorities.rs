//! UpdatePrioritiesHandler - Command handler for replacing the priority list.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::SessionRepository;

/// Command to replace the working copy's priorities.
#[derive(Debug, Clone)]
pub struct UpdatePrioritiesCommand {
    pub session_id: SessionId,
    pub priorities: Vec<String>,
}

/// Handler for priority edits.
pub struct UpdatePrioritiesHandler {
    repository: Arc<dyn SessionRepository>,
}

impl UpdatePrioritiesHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdatePrioritiesCommand,
    ) -> Result<AnalysisSession, DomainError> {
        let priorities = cmd.priorities;
        self.repository
            .update(
                &cmd.session_id,
                Box::new(move |session: &mut AnalysisSession| {
                    session.set_priorities(priorities)
                }),
            )
            .await
    }
}
