//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /summary             -> summary
/// GET /recent-incidents    -> recent_incidents
/// GET /upcoming-deadlines  -> upcoming_deadlines
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(dashboard::summary))
        .route("/recent-incidents", get(dashboard::recent_incidents))
        .route("/upcoming-deadlines", get(dashboard::upcoming_deadlines))
}
