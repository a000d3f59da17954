//! Session command and query handlers.

mod get_session;
mod in_flight;
mod reset_session;
mod run_analysis;
mod start_session;
mod update_parameter;
mod update_priorities;

pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use in_flight::{InFlightPermit, InFlightRegistry};
pub use reset_session::{ResetSessionCommand, ResetSessionHandler};
pub use run_analysis::{RunAnalysisCommand, RunAnalysisHandler};
pub use start_session::{StartSessionCommand, StartSessionHandler};
pub use update_parameter::{UpdateParameterCommand, UpdateParameterHandler};
pub use update_priorities::{UpdatePrioritiesCommand, UpdatePrioritiesHandler};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::SessionRepository;

/// Loads a session or fails with `SessionNotFound`.
async fn load_session(
    repository: &dyn SessionRepository,
    id: &SessionId,
) -> Result<AnalysisSession, DomainError> {
    repository.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::SessionNotFound, format!("Session {} not found", id))
    })
}
