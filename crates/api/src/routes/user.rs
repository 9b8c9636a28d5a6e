//! Route definitions for the `/user` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// Admin-only except `/staff` (any role) and `GET /{id}` for oneself.
///
/// ```text
/// GET    /                     -> list_users
/// POST   /                     -> create_user
/// GET    /staff                -> list_staff
/// GET    /{id}                 -> get_user
/// PUT    /{id}                 -> update_user
/// DELETE /{id}                 -> delete_user
/// POST   /{id}/reset-password  -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route("/staff", get(user::list_staff))
        .route(
            "/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/{id}/reset-password", post(user::reset_password))
}
