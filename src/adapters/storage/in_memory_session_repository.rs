//! In-Memory Session Repository
//!
//! Stores analysis sessions in process memory. Sessions vanish on restart.
//! With an idle TTL configured, a session whose last edit is older than the
//! TTL is treated as gone and removed by [`InMemorySessionRepository::evict_idle`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::{SessionRepository, SessionUpdate};

/// In-memory storage for analysis sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, AnalysisSession>>>,
    idle_ttl: Option<Duration>,
}

impl InMemorySessionRepository {
    /// Create an empty repository that never expires sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire sessions not edited for `ttl`.
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    /// Number of stored sessions, expired ones included until evicted.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle as of `now`. Returns how many were removed.
    pub async fn evict_idle_at(&self, now: DateTime<Utc>) -> usize {
        if self.idle_ttl.is_none() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        let evicted = before - sessions.len();

        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Remove sessions idle as of now.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Utc::now()).await
    }

    fn is_expired(&self, session: &AnalysisSession, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.idle_ttl else {
            return false;
        };
        // A negative idle span (clock skew) converts to Err and counts as fresh
        (now - session.updated_at())
            .to_std()
            .map(|idle| idle >= ttl)
            .unwrap_or(false)
    }

    fn live(
        &self,
        sessions: &HashMap<SessionId, AnalysisSession>,
        id: &SessionId,
    ) -> Option<AnalysisSession> {
        sessions
            .get(id)
            .filter(|session| !self.is_expired(session, Utc::now()))
            .cloned()
    }
}

fn not_found(id: &SessionId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, format!("Session {} not found", id))
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &AnalysisSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<AnalysisSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(self.live(&sessions, id))
    }

    async fn update(
        &self,
        id: &SessionId,
        apply: SessionUpdate,
    ) -> Result<AnalysisSession, DomainError> {
        let mut sessions = self.sessions.write().await;
        let mut session = self.live(&sessions, id).ok_or_else(|| not_found(id))?;

        apply(&mut session)?;
        sessions.insert(*id, session.clone());
        Ok(session)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(id).ok_or_else(|| not_found(id))?;
        if self.is_expired(&removed, Utc::now()) {
            return Err(not_found(id));
        }
        Ok(())
    }
}
