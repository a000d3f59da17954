//! Session repository port.
//!
//! Defines the contract for storing and retrieving AnalysisSession
//! aggregates. Sessions are process-local; nothing is persisted across
//! restarts.

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::AnalysisSession;
use async_trait::async_trait;

/// Mutation applied to a stored session by [`SessionRepository::update`].
pub type SessionUpdate =
    Box<dyn FnOnce(&mut AnalysisSession) -> Result<(), DomainError> + Send>;

/// Repository port for AnalysisSession storage.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert or replace a session.
    async fn save(&self, session: &AnalysisSession) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<AnalysisSession>, DomainError>;

    /// Apply `apply` to the stored session and store the result.
    ///
    /// No other write to the same store interleaves between reading the
    /// session and storing it. Nothing is stored when `apply` fails.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    /// - whatever `apply` returns
    async fn update(
        &self,
        id: &SessionId,
        apply: SessionUpdate,
    ) -> Result<AnalysisSession, DomainError>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;
}
