//! HTTP handlers for the Referee endpoints.
//!
//! These handlers connect Axum routes to the session command/query handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::session::{
    GetSessionHandler, GetSessionQuery, InFlightRegistry, ResetSessionCommand,
    ResetSessionHandler, RunAnalysisCommand, RunAnalysisHandler, StartSessionCommand,
    StartSessionHandler, UpdateParameterCommand, UpdateParameterHandler, UpdatePrioritiesCommand,
    UpdatePrioritiesHandler,
};
use crate::domain::decision::DecisionCategory;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::AnalysisSession;
use crate::ports::{OptionComparator, ParameterSynthesizer, SessionRepository};

use super::dto::{
    CategoryResponse, ErrorResponse, HealthResponse, SessionView, StartSessionRequest,
    UpdateParameterRequest, UpdatePrioritiesRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct RefereeAppState {
    pub synthesizer: Arc<dyn ParameterSynthesizer>,
    pub comparator: Arc<dyn OptionComparator>,
    pub repository: Arc<dyn SessionRepository>,
    pub in_flight: InFlightRegistry,
}

impl RefereeAppState {
    pub fn new(
        synthesizer: Arc<dyn ParameterSynthesizer>,
        comparator: Arc<dyn OptionComparator>,
        repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            synthesizer,
            comparator,
            repository,
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn start_session_handler(&self) -> StartSessionHandler {
        StartSessionHandler::new(self.synthesizer.clone(), self.repository.clone())
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.repository.clone())
    }

    pub fn update_parameter_handler(&self) -> UpdateParameterHandler {
        UpdateParameterHandler::new(self.repository.clone())
    }

    pub fn update_priorities_handler(&self) -> UpdatePrioritiesHandler {
        UpdatePrioritiesHandler::new(self.repository.clone())
    }

    pub fn run_analysis_handler(&self) -> RunAnalysisHandler {
        RunAnalysisHandler::new(
            self.comparator.clone(),
            self.repository.clone(),
            self.in_flight.clone(),
        )
    }

    pub fn reset_session_handler(&self) -> ResetSessionHandler {
        ResetSessionHandler::new(self.repository.clone())
    }

    fn view(&self, session: &AnalysisSession) -> SessionView {
        SessionView::new(session, self.in_flight.is_active(session.id()))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// GET /api/categories
pub async fn list_categories() -> impl IntoResponse {
    let categories: Vec<CategoryResponse> = DecisionCategory::all()
        .iter()
        .copied()
        .map(CategoryResponse::from)
        .collect();
    Json(categories)
}

/// POST /api/sessions - Synthesize parameters and open a session
pub async fn start_session(
    State(state): State<RefereeAppState>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let cmd = StartSessionCommand {
        category: req.category,
        problem_statement: req.problem_statement,
    };

    let session = state.start_session_handler().handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(state.view(&session))))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<RefereeAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetSessionQuery {
        session_id: parse_session_id(&session_id)?,
    };

    let session = state.get_session_handler().handle(query).await?;

    Ok(Json(state.view(&session)))
}

/// PUT /api/sessions/:id/parameters/:param_id
pub async fn update_parameter(
    State(state): State<RefereeAppState>,
    Path((session_id, param_id)): Path<(String, String)>,
    payload: Result<Json<UpdateParameterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let cmd = UpdateParameterCommand {
        session_id: parse_session_id(&session_id)?,
        param_id,
        value: req.value,
    };

    let session = state.update_parameter_handler().handle(cmd).await?;

    Ok(Json(state.view(&session)))
}

/// PUT /api/sessions/:id/priorities
pub async fn update_priorities(
    State(state): State<RefereeAppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<UpdatePrioritiesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let cmd = UpdatePrioritiesCommand {
        session_id: parse_session_id(&session_id)?,
        priorities: req.priorities,
    };

    let session = state.update_priorities_handler().handle(cmd).await?;

    Ok(Json(state.view(&session)))
}

/// POST /api/sessions/:id/analysis - Run or refresh the comparison
pub async fn run_analysis(
    State(state): State<RefereeAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RunAnalysisCommand {
        session_id: parse_session_id(&session_id)?,
    };

    let session = state.run_analysis_handler().handle(cmd).await?;

    Ok(Json(state.view(&session)))
}

/// DELETE /api/sessions/:id
pub async fn reset_session(
    State(state): State<RefereeAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ResetSessionCommand {
        session_id: parse_session_id(&session_id)?,
    };

    state.reset_session_handler().handle(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid session ID: {}", raw)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Domain(DomainError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

/// Unreadable or mistyped request bodies get the same JSON error shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat
        | ErrorCode::ParameterTypeMismatch => StatusCode::BAD_REQUEST,
        ErrorCode::SessionNotFound | ErrorCode::ParameterNotFound => StatusCode::NOT_FOUND,
        ErrorCode::NoChanges | ErrorCode::AnalysisInProgress => StatusCode::CONFLICT,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::AIProviderError => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::BadRequest(msg) => {
                return (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(msg)))
                    .into_response()
            }
            ApiError::Domain(err) => err,
        };

        let status = status_for(err.code);
        if status.is_server_error() {
            tracing::error!(code = %err.code, message = %err.message, "Request failed");
        }

        let mut response = (status, Json(ErrorResponse::from(&err))).into_response();
        if let Some(retry_after) = err
            .details
            .get("retry_after_secs")
            .and_then(|secs| HeaderValue::from_str(secs).ok())
        {
            response.headers_mut().insert(header::RETRY_AFTER, retry_after);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn validation_codes_map_to_bad_request() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::EmptyField,
            ErrorCode::OutOfRange,
            ErrorCode::InvalidFormat,
            ErrorCode::ParameterTypeMismatch,
        ] {
            assert_eq!(status_for(code), StatusCode::BAD_REQUEST, "{:?}", code);
        }
    }

    #[test]
    fn state_conflicts_map_to_conflict() {
        assert_eq!(status_for(ErrorCode::NoChanges), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::AnalysisInProgress), StatusCode::CONFLICT);
    }

    #[test]
    fn provider_failure_maps_to_bad_gateway() {
        assert_eq!(status_for(ErrorCode::AIProviderError), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_session_id_is_bad_request() {
        let err = parse_session_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn rate_limited_response_sets_retry_after() {
        let err = DomainError::new(ErrorCode::RateLimited, "Rate limited")
            .with_detail("retry_after_secs", "15");

        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "15");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.code, "RATE_LIMITED");
    }
}
