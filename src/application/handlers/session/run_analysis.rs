//! RunAnalysisHandler - Command handler for comparing options.
//!
//! The first analysis of a session is always allowed; later ones need the
//! working copy to differ from the committed baseline. At most one
//! comparison per session runs at a time.

use std::sync::Arc;

use super::{load_session, InFlightRegistry};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::{AIError, OptionComparator, SessionRepository};

/// Command to run (or refresh) the comparison for a session.
#[derive(Debug, Clone)]
pub struct RunAnalysisCommand {
    pub session_id: SessionId,
}

/// Handler for comparisons.
pub struct RunAnalysisHandler {
    comparator: Arc<dyn OptionComparator>,
    repository: Arc<dyn SessionRepository>,
    in_flight: InFlightRegistry,
}

impl RunAnalysisHandler {
    pub fn new(
        comparator: Arc<dyn OptionComparator>,
        repository: Arc<dyn SessionRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            comparator,
            repository,
            in_flight,
        }
    }

    /// # Errors
    ///
    /// - `AnalysisInProgress` if a comparison for the session is running
    /// - `SessionNotFound` if the session does not exist (or was reset meanwhile)
    /// - `NoChanges` if nothing was edited since the last analysis
    /// - `RateLimited` / `AIProviderError` if the provider call fails; the
    ///   previous result and baseline are left untouched
    pub async fn handle(&self, cmd: RunAnalysisCommand) -> Result<AnalysisSession, DomainError> {
        // 1. Claim the session's slot; released when `_permit` drops
        let _permit = self.in_flight.try_acquire(cmd.session_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::AnalysisInProgress,
                "An analysis is already running for this session",
            )
        })?;

        // 2. Snapshot the working copy
        let session = load_session(self.repository.as_ref(), &cmd.session_id).await?;
        let submitted = session.begin_analysis()?;

        // 3. Compare without holding any store lock
        let result = self
            .comparator
            .compare(&submitted)
            .await
            .map_err(|e| provider_error(&cmd.session_id, e))?;

        // 4. Commit against the latest copy so edits made while in flight are kept
        let session = self
            .repository
            .update(
                &cmd.session_id,
                Box::new(move |session: &mut AnalysisSession| {
                    session.complete_analysis(submitted, result);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            session_id = %cmd.session_id,
            options = session.result().map(|r| r.options.len()).unwrap_or(0),
            "Analysis completed"
        );

        Ok(session)
    }
}

fn provider_error(session_id: &SessionId, err: AIError) -> DomainError {
    tracing::warn!(session_id = %session_id, error = %err, "Analysis failed");

    match err {
        AIError::RateLimited { retry_after_secs } => {
            DomainError::new(ErrorCode::RateLimited, err.to_string())
                .with_detail("retry_after_secs", retry_after_secs.to_string())
        }
        other => DomainError::new(ErrorCode::AIProviderError, other.to_string()),
    }
}
