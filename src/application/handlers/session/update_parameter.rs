//! UpdateParameterHandler - Command handler for editing one parameter.

use std::sync::Arc;

use crate::domain::decision::ParameterValue;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::SessionRepository;

/// Command to set a parameter's value on the working copy.
#[derive(Debug, Clone)]
pub struct UpdateParameterCommand {
    pub session_id: SessionId,
    pub param_id: String,
    pub value: ParameterValue,
}

/// Handler for parameter edits.
pub struct UpdateParameterHandler {
    repository: Arc<dyn SessionRepository>,
}

impl UpdateParameterHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateParameterCommand) -> Result<AnalysisSession, DomainError> {
        let param_id = cmd.param_id.clone();
        let value = cmd.value;
        let session = self
            .repository
            .update(
                &cmd.session_id,
                Box::new(move |session: &mut AnalysisSession| {
                    session.set_param(&param_id, value)
                }),
            )
            .await?;

        tracing::debug!(
            session_id = %cmd.session_id,
            param_id = %cmd.param_id,
            has_changes = session.state().has_changes(),
            "Parameter updated"
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::session::test_support::{repository, stored_session};
    use crate::domain::foundation::ErrorCode;
    use crate::ports::SessionUpdate;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Store whose reads are slow enough for concurrent edits to overlap.
    struct SlowReads(Arc<crate::adapters::storage::InMemorySessionRepository>);

    #[async_trait]
    impl SessionRepository for SlowReads {
        async fn save(&self, session: &AnalysisSession) -> Result<(), DomainError> {
            self.0.save(session).await
        }

        async fn find_by_id(&self, id: &SessionId) -> Result<Option<AnalysisSession>, DomainError> {
            let found = self.0.find_by_id(id).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            found
        }

        async fn update(
            &self,
            id: &SessionId,
            apply: SessionUpdate,
        ) -> Result<AnalysisSession, DomainError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.0.update(id, apply).await
        }

        async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn concurrent_edits_to_different_parameters_both_survive() {
        let repo = repository();
        let session = stored_session(&repo).await;
        let handler = Arc::new(UpdateParameterHandler::new(Arc::new(SlowReads(repo.clone()))));

        let edits = [
            ("capital", ParameterValue::Number(300.0)),
            ("franchise", ParameterValue::Flag(true)),
        ];
        let tasks: Vec<_> = edits
            .into_iter()
            .map(|(param_id, value)| {
                let handler = Arc::clone(&handler);
                let cmd = UpdateParameterCommand {
                    session_id: *session.id(),
                    param_id: param_id.to_string(),
                    value,
                };
                tokio::spawn(async move { handler.handle(cmd).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = repo.find_by_id(session.id()).await.unwrap().unwrap();
        let working = stored.state().working();
        assert_eq!(
            working.param("capital").unwrap().value(),
            ParameterValue::Number(300.0)
        );
        assert_eq!(
            working.param("franchise").unwrap().value(),
            ParameterValue::Flag(true)
        );
    }

    #[tokio::test]
    async fn edit_is_saved_and_reported_as_change() {
        let repo = repository();
        let session = stored_session(&repo).await;
        let handler = UpdateParameterHandler::new(repo.clone());

        let updated = handler
            .handle(UpdateParameterCommand {
                session_id: *session.id(),
                param_id: "franchise".to_string(),
                value: ParameterValue::Flag(true),
            })
            .await
            .unwrap();

        assert!(updated.state().has_changes());
        let stored = repo.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(
            stored.state().working().param("franchise").unwrap().value(),
            ParameterValue::Flag(true)
        );
    }

    #[tokio::test]
    async fn out_of_range_value_is_rejected_and_not_saved() {
        let repo = repository();
        let session = stored_session(&repo).await;
        let handler = UpdateParameterHandler::new(repo.clone());

        let err = handler
            .handle(UpdateParameterCommand {
                session_id: *session.id(),
                param_id: "capital".to_string(),
                value: ParameterValue::Number(900.0),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::OutOfRange);
        let stored = repo.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(!stored.state().has_changes());
    }

    #[tokio::test]
    async fn unknown_parameter_is_not_found() {
        let repo = repository();
        let session = stored_session(&repo).await;
        let handler = UpdateParameterHandler::new(repo);

        let err = handler
            .handle(UpdateParameterCommand {
                session_id: *session.id(),
                param_id: "nope".to_string(),
                value: ParameterValue::Flag(true),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ParameterNotFound);
    }
}
