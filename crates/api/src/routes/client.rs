//! Route definitions for the `/client` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::client;
use crate::state::AppState;

/// Routes mounted at `/client`.
///
/// ```text
/// GET    /             -> list_clients
/// POST   /             -> create_client (admin)
/// GET    /{id}         -> get_client
/// PUT    /{id}         -> update_client (admin)
/// DELETE /{id}         -> delete_client (admin)
/// PUT    /{id}/assign  -> assign_staff (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(client::list_clients).post(client::create_client))
        .route(
            "/{id}",
            get(client::get_client)
                .put(client::update_client)
                .delete(client::delete_client),
        )
        .route("/{id}/assign", put(client::assign_staff))
}
