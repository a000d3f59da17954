//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod session;

pub use session::{
    GetSessionHandler, GetSessionQuery, InFlightPermit, InFlightRegistry, ResetSessionCommand,
    ResetSessionHandler, RunAnalysisCommand, RunAnalysisHandler, StartSessionCommand,
    StartSessionHandler, UpdateParameterCommand, UpdateParameterHandler, UpdatePrioritiesCommand,
    UpdatePrioritiesHandler,
};
