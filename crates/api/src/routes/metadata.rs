//! Route definitions for the `/metadata` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::metadata;
use crate::state::AppState;

/// Routes mounted at `/metadata`.
///
/// ```text
/// GET  /            -> list_categories
/// POST /refresh     -> refresh (admin)
/// GET  /{category}  -> get_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(metadata::list_categories))
        .route("/refresh", post(metadata::refresh))
        .route("/{category}", get(metadata::get_category))
}
