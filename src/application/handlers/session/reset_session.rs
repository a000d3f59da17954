//! ResetSessionHandler - Command handler for discarding a session.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::SessionRepository;

/// Command to drop a session and everything it holds.
#[derive(Debug, Clone)]
pub struct ResetSessionCommand {
    pub session_id: SessionId,
}

/// Handler for resets.
pub struct ResetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl ResetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: ResetSessionCommand) -> Result<(), DomainError> {
        self.repository.delete(&cmd.session_id).await?;
        tracing::info!(session_id = %cmd.session_id, "Session reset");
        Ok(())
    }
}
