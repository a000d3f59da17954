//! Route configuration for the Referee endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    get_session, health, list_categories, reset_session, run_analysis, start_session,
    update_parameter, update_priorities, RefereeAppState,
};

/// Creates the Referee router with all endpoints.
///
/// Routes:
/// - `GET /health` - Liveness check
/// - `GET /api/categories` - Selectable decision categories
/// - `POST /api/sessions` - Start a session from a dilemma
/// - `GET /api/sessions/:id` - Current session view
/// - `DELETE /api/sessions/:id` - Reset (discard) a session
/// - `PUT /api/sessions/:id/parameters/:param_id` - Edit one parameter
/// - `PUT /api/sessions/:id/priorities` - Replace the priority list
/// - `POST /api/sessions/:id/analysis` - Run or refresh the comparison
pub fn referee_router() -> Router<RefereeAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/categories", get(list_categories))
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/:id", get(get_session).delete(reset_session))
        .route(
            "/api/sessions/:id/parameters/:param_id",
            put(update_parameter),
        )
        .route("/api/sessions/:id/priorities", put(update_priorities))
        .route("/api/sessions/:id/analysis", post(run_analysis))
}
