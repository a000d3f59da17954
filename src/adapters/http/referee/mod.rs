//! HTTP adapter for the Referee endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CategoryResponse, ErrorResponse, HealthResponse, SessionView, StartSessionRequest,
    UpdateParameterRequest, UpdatePrioritiesRequest,
};
pub use handlers::{status_for, ApiError, RefereeAppState};
pub use routes::referee_router;
