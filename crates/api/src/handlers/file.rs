//! Handlers for `/file`: upload, download and removal of the file attached
//! to a client document.

use std::io;

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use careoffice_core::error::CoreError;
use careoffice_core::files::{content_type_for, stored_file_name};
use careoffice_core::types::DbId;
use careoffice_db::models::client_document::{AttachFile, ClientDocumentResponse};
use careoffice_db::repositories::ClientDocumentRepo;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::handlers::document::find_visible_document;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::today;
use crate::state::AppState;

/// POST /api/file/upload/{document_id}
///
/// Accepts a multipart form with a required `file` field. Any previous file
/// on the document is replaced and deleted from disk. Admins and staff
/// assigned to the document's client may upload.
pub async fn upload_file(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(document_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<ClientDocumentResponse>> {
    let doc = find_visible_document(&state, &user, document_id).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((raw_name, data.to_vec()));
    }

    let (raw_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let file_name = state.storage.validate_upload(&raw_name, data.len())?;

    let stored = stored_file_name(&file_name);
    state
        .storage
        .save(doc.client_id, &stored, &data)
        .await
        .map_err(io_error)?;

    let attach = AttachFile {
        content_type: content_type_for(&file_name).to_string(),
        file_name,
        stored_file_name: stored.clone(),
        file_size_bytes: data.len() as i64,
        uploaded_by_id: user.user_id,
    };
    let swap = match ClientDocumentRepo::attach_file(&state.pool, document_id, &attach).await {
        Ok(Some(swap)) => swap,
        Ok(None) => {
            discard(&state, doc.client_id, &stored).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Document",
                id: document_id,
            }));
        }
        Err(e) => {
            discard(&state, doc.client_id, &stored).await;
            return Err(e.into());
        }
    };

    if let Some(previous) = swap.previous_stored_file_name.as_deref() {
        discard(&state, doc.client_id, previous).await;
    }

    tracing::info!(
        document_id,
        client_id = doc.client_id,
        size = attach.file_size_bytes,
        uploaded_by = user.user_id,
        "Document file uploaded"
    );
    Ok(Json(ClientDocumentResponse::new(swap.document, today())))
}

/// GET /api/file/download/{document_id}
///
/// Streams the stored file as an attachment under its original name.
pub async fn download_file(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(document_id): Path<DbId>,
) -> AppResult<Response> {
    let doc = find_visible_document(&state, &user, document_id).await?;
    let no_file = || {
        AppError::Core(CoreError::NotFound {
            entity: "File",
            id: document_id,
        })
    };

    let stored = doc.stored_file_name.as_deref().ok_or_else(no_file)?;
    let file = match state.storage.open(doc.client_id, stored).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(document_id, stored, "Stored file missing on disk");
            return Err(no_file());
        }
        Err(e) => return Err(io_error(e)),
    };
    let size = file.metadata().await.map_err(io_error)?.len();

    let file_name = doc.file_name.as_deref().unwrap_or(stored);
    let content_type = doc
        .content_type
        .clone()
        .unwrap_or_else(|| content_type_for(file_name).to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CONTENT_DISPOSITION, content_disposition(file_name))
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// DELETE /api/file/{document_id}
///
/// Removes the file from disk and clears the document's file columns.
pub async fn delete_file(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(document_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let swap = ClientDocumentRepo::clear_file(&state.pool, document_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: document_id,
        }))?;
    let stored = swap
        .previous_stored_file_name
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "File",
            id: document_id,
        }))?;
    discard(&state, swap.document.client_id, &stored).await;

    tracing::info!(document_id, deleted_by = admin.user_id, "Document file removed");
    Ok(StatusCode::NO_CONTENT)
}

/// `attachment; filename="..."` with quotes and backslashes neutralised.
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

/// Best-effort removal of a stored file; failures are logged, not returned.
async fn discard(state: &AppState, client_id: DbId, stored: &str) {
    if let Err(e) = state.storage.remove(client_id, stored).await {
        tracing::warn!(client_id, stored, error = %e, "Failed to remove stored file");
    }
}

fn io_error(e: io::Error) -> AppError {
    tracing::error!(error = %e, "File storage error");
    AppError::InternalError("File storage error".into())
}
