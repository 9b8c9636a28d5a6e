//! Route definitions for the `/document` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::document;
use crate::state::AppState;

/// Routes mounted at `/document`.
///
/// ```text
/// GET    /                    -> list_documents
/// POST   /                    -> create_document (admin)
/// GET    /client/{client_id}  -> list_client_documents
/// GET    /{id}                -> get_document
/// PUT    /{id}                -> update_document (admin)
/// DELETE /{id}                -> delete_document (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(document::list_documents).post(document::create_document),
        )
        .route("/client/{client_id}", get(document::list_client_documents))
        .route(
            "/{id}",
            get(document::get_document)
                .put(document::update_document)
                .delete(document::delete_document),
        )
}
