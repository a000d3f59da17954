//! GetSessionHandler - Query handler for retrieving a session.

use std::sync::Arc;

use super::load_session;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::SessionRepository;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving sessions.
pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<AnalysisSession, DomainError> {
        load_session(self.repository.as_ref(), &query.session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::test_support::{repository, stored_session};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn returns_stored_session() {
        let repo = repository();
        let session = stored_session(&repo).await;
        let handler = GetSessionHandler::new(repo);

        let found = handler
            .handle(GetSessionQuery {
                session_id: *session.id(),
            })
            .await
            .unwrap();

        assert_eq!(found.id(), session.id());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = GetSessionHandler::new(repository());

        let err = handler
            .handle(GetSessionQuery {
                session_id: SessionId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }
}
