//! Route definitions for the `/file` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/file`.
///
/// ```text
/// POST   /upload/{document_id}    -> upload_file (multipart)
/// GET    /download/{document_id}  -> download_file
/// DELETE /{document_id}           -> delete_file (admin)
/// ```
///
/// Only this group raises the body limit. The size check proper happens in
/// the upload handler so an oversize file gets a JSON 400 rather than a bare
/// 413 from the body reader.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload/{document_id}", post(file::upload_file))
        .route("/download/{document_id}", get(file::download_file))
        .route("/{document_id}", delete(file::delete_file))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
}
