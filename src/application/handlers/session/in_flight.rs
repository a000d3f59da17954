//! Single-slot guard against overlapping comparisons per session.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::SessionId;

/// Tracks which sessions currently have a comparison running.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<Mutex<HashSet<SessionId>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `id`.
    ///
    /// Returns `None` if a comparison for the session is already running.
    /// The slot is released when the permit is dropped.
    pub fn try_acquire(&self, id: SessionId) -> Option<InFlightPermit> {
        if !self.lock().insert(id) {
            return None;
        }
        Some(InFlightPermit {
            active: Arc::clone(&self.active),
            id,
        })
    }

    /// Whether a comparison is running for `id`.
    pub fn is_active(&self, id: &SessionId) -> bool {
        self.lock().contains(id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<SessionId>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of one comparison.
#[derive(Debug)]
pub struct InFlightPermit {
    active: Arc<Mutex<HashSet<SessionId>>>,
    id: SessionId,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
