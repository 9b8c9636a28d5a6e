//! Handlers for the `/document` resource (required client documents).
//!
//! Status is derived on every read against today's UTC date and is never
//! stored, so status filtering and paging happen after derivation.

use axum::extract::State;
use axum::http::StatusCode;
use careoffice_core::document_status::DocumentStatus;
use careoffice_core::error::CoreError;
use careoffice_core::lookups::{parse_optional_lookup, DocumentType};
use careoffice_core::types::DbId;
use careoffice_db::models::client_document::{
    ClientDocument, ClientDocumentResponse, CreateClientDocument, DocumentFilter,
    UpdateClientDocument,
};
use careoffice_db::models::page::Page;
use careoffice_db::repositories::{ClientDocumentRepo, ClientRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::client::find_visible_client;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::{resolve_page, today};
use crate::state::AppState;

/// Query parameters for `GET /document`.
#[derive(Debug, Deserialize)]
pub struct DocumentListParams {
    pub client_id: Option<DbId>,
    /// `overdue`, `upload` or `pending`.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/document
pub async fn list_documents(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<DocumentListParams>,
) -> AppResult<Json<Page<ClientDocumentResponse>>> {
    let status = parse_status_filter(params.status.as_deref())?;
    let (limit, offset) = resolve_page(params.limit, params.offset);

    let filter = DocumentFilter {
        assigned_to: user.scope(),
        client_id: params.client_id,
    };
    let rows = ClientDocumentRepo::list(&state.pool, &filter).await?;

    let today = today();
    let matching: Vec<ClientDocumentResponse> = rows
        .into_iter()
        .map(|doc| ClientDocumentResponse::new(doc, today))
        .filter(|doc| status.map_or(true, |s| doc.status == s))
        .collect();

    Ok(Json(Page::from_vec(matching, limit, offset)))
}

/// GET /api/document/client/{client_id}
pub async fn list_client_documents(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<Vec<ClientDocumentResponse>>> {
    find_visible_client(&state, &user, client_id).await?;

    let filter = DocumentFilter {
        assigned_to: None,
        client_id: Some(client_id),
    };
    let today = today();
    let docs = ClientDocumentRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|doc| ClientDocumentResponse::new(doc, today))
        .collect();
    Ok(Json(docs))
}

/// GET /api/document/{id}
pub async fn get_document(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ClientDocumentResponse>> {
    let doc = find_visible_document(&state, &user, id).await?;
    Ok(Json(ClientDocumentResponse::new(doc, today())))
}

/// POST /api/document
pub async fn create_document(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateClientDocument>,
) -> AppResult<(StatusCode, Json<ClientDocumentResponse>)> {
    input.validate()?;
    parse_optional_lookup::<DocumentType>(input.document_type_id)?;
    if ClientRepo::find_by_id(&state.pool, input.client_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Client {} does not exist",
            input.client_id
        ))));
    }

    let doc = ClientDocumentRepo::create(&state.pool, &input).await?;
    tracing::info!(
        document_id = doc.id,
        client_id = doc.client_id,
        created_by = admin.user_id,
        "Document requirement created"
    );
    Ok((
        StatusCode::CREATED,
        Json(ClientDocumentResponse::new(doc, today())),
    ))
}

/// PUT /api/document/{id}
pub async fn update_document(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClientDocument>,
) -> AppResult<Json<ClientDocumentResponse>> {
    input.validate()?;
    parse_optional_lookup::<DocumentType>(input.document_type_id)?;

    let doc = ClientDocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    Ok(Json(ClientDocumentResponse::new(doc, today())))
}

/// DELETE /api/document/{id}
///
/// Soft delete. An attached file stays on disk.
pub async fn delete_document(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientDocumentRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))
    }
}

/// Load a document whose client the caller can see, or 404.
pub(crate) async fn find_visible_document(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<ClientDocument> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        })
    };

    let doc = ClientDocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let Some(staff_id) = user.scope() else {
        return Ok(doc);
    };
    if ClientRepo::is_assigned_to(&state.pool, doc.client_id, staff_id).await? {
        Ok(doc)
    } else {
        Err(not_found())
    }
}

fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<DocumentStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => DocumentStatus::parse(&value.to_lowercase())
            .map(Some)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Unknown document status '{value}'. Expected overdue, upload or pending"
                ))
            }),
    }
}
