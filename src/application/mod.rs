//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (start, edit, analyze, reset) are kept apart from the
//! session query handler.

pub mod handlers;

pub use handlers::{
    GetSessionHandler, GetSessionQuery, InFlightRegistry, ResetSessionCommand,
    ResetSessionHandler, RunAnalysisCommand, RunAnalysisHandler, StartSessionCommand,
    StartSessionHandler, UpdateParameterCommand, UpdateParameterHandler, UpdatePrioritiesCommand,
    UpdatePrioritiesHandler,
};
