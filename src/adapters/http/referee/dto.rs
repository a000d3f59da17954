//! HTTP DTOs (Data Transfer Objects) for session endpoints.
//!
//! These types define the JSON request/response structure for the Referee API.
//! They serve as the boundary between HTTP and the application layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::decision::{
    ComparisonResponse, DecisionCategory, DynamicParameter, MetricRow, ParameterValue,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::session::{AnalysisSession, SessionPhase};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a new session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[serde(default)]
    pub category: DecisionCategory,
    pub problem_statement: String,
}

/// Request to set one parameter. `value` is a bool, number, or string.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParameterRequest {
    pub value: ParameterValue,
}

/// Request to replace the priority list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePrioritiesRequest {
    pub priorities: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Everything the presentation needs to render a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub phase: SessionPhase,
    pub problem_statement: String,
    pub category: DecisionCategory,
    /// Working copy of the parameters.
    pub parameters: Vec<DynamicParameter>,
    pub priorities: Vec<String>,
    pub suggested_priorities: Vec<String>,
    pub has_changes: bool,
    pub is_refreshing: bool,
    pub can_refresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ComparisonResponse>,
    /// Scores regrouped per metric, empty until the first analysis.
    pub tradeoff_matrix: Vec<MetricRow>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn new(session: &AnalysisSession, is_refreshing: bool) -> Self {
        let working = session.state().working();
        Self {
            id: session.id().to_string(),
            phase: session.phase(),
            problem_statement: working.problem_statement.clone(),
            category: working.category,
            parameters: working.dynamic_params.clone(),
            priorities: working.priorities.clone(),
            suggested_priorities: session.suggested_priorities().to_vec(),
            has_changes: session.state().has_changes(),
            is_refreshing,
            can_refresh: session.state().can_refresh(is_refreshing),
            result: session.result().cloned(),
            tradeoff_matrix: session
                .result()
                .map(ComparisonResponse::tradeoff_matrix)
                .unwrap_or_default(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

/// One selectable category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: DecisionCategory,
    pub display_name: &'static str,
}

impl From<DecisionCategory> for CategoryResponse {
    fn from(category: DecisionCategory) -> Self {
        Self {
            id: category,
            display_name: category.display_name(),
        }
    }
}

/// Liveness check body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InternalError.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
            details,
        }
    }
}
