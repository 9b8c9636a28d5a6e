//! Route definitions for the `/incident` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::incident;
use crate::state::AppState;

/// Routes mounted at `/incident`.
///
/// ```text
/// GET    /             -> list_incidents
/// POST   /             -> create_incident
/// GET    /{id}         -> get_incident
/// PUT    /{id}         -> update_incident (reporter or admin)
/// DELETE /{id}         -> delete_incident (admin)
/// PUT    /{id}/status  -> update_status (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(incident::list_incidents).post(incident::create_incident),
        )
        .route(
            "/{id}",
            get(incident::get_incident)
                .put(incident::update_incident)
                .delete(incident::delete_incident),
        )
        .route("/{id}/status", put(incident::update_status))
}
