//! Repository for the `client_documents` table.

use careoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::client_document::{
    AttachFile, ClientDocument, CreateClientDocument, DocumentFilter, FileSwap,
    UpdateClientDocument,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, title, document_type_id, deadline, notes, file_name, \
                        stored_file_name, content_type, file_size_bytes, uploaded_at, \
                        uploaded_by_id, created_at, updated_at";

/// Same columns qualified with the `d` alias, for joined queries.
const D_COLUMNS: &str = "d.id, d.client_id, d.title, d.document_type_id, d.deadline, d.notes, \
                          d.file_name, d.stored_file_name, d.content_type, d.file_size_bytes, \
                          d.uploaded_at, d.uploaded_by_id, d.created_at, d.updated_at";

/// Provides CRUD and file-attachment operations for client documents.
pub struct ClientDocumentRepo;

impl ClientDocumentRepo {
    /// Insert a new document requirement, returning the created row.
    ///
    /// Document type defaults to 6 (Other).
    pub async fn create(
        pool: &PgPool,
        input: &CreateClientDocument,
    ) -> Result<ClientDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_documents (client_id, title, document_type_id, deadline, notes)
             VALUES ($1, $2, COALESCE($3, 6), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientDocument>(&query)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(input.document_type_id)
            .bind(input.deadline)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a document by ID. Excludes soft-deleted documents and documents
    /// of soft-deleted clients.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClientDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {D_COLUMNS} FROM client_documents d
             JOIN clients c ON c.id = d.client_id
             WHERE d.id = $1 AND d.is_deleted = false AND c.is_deleted = false"
        );
        sqlx::query_as::<_, ClientDocument>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List documents matching `filter`, earliest deadline first.
    ///
    /// Unpaginated: status is derived per row, so callers filter and page
    /// the result in memory.
    pub async fn list(
        pool: &PgPool,
        filter: &DocumentFilter,
    ) -> Result<Vec<ClientDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {D_COLUMNS} FROM client_documents d
             JOIN clients c ON c.id = d.client_id
             WHERE d.is_deleted = false AND c.is_deleted = false
               AND ($1::BIGINT IS NULL OR c.assigned_staff_id = $1)
               AND ($2::BIGINT IS NULL OR d.client_id = $2)
             ORDER BY d.deadline ASC, d.id ASC"
        );
        sqlx::query_as::<_, ClientDocument>(&query)
            .bind(filter.assigned_to)
            .bind(filter.client_id)
            .fetch_all(pool)
            .await
    }

    /// Update a document requirement. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClientDocument,
    ) -> Result<Option<ClientDocument>, sqlx::Error> {
        let query = format!(
            "UPDATE client_documents SET
                title = COALESCE($2, title),
                document_type_id = COALESCE($3, document_type_id),
                deadline = COALESCE($4, deadline),
                notes = COALESCE($5, notes)
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientDocument>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.document_type_id)
            .bind(input.deadline)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Record an uploaded file against a document, replacing any previous
    /// file metadata and stamping `uploaded_at`.
    ///
    /// The row is locked while its old stored name is read, so concurrent
    /// uploads each see the name the other replaced.
    pub async fn attach_file(
        pool: &PgPool,
        id: DbId,
        file: &AttachFile,
    ) -> Result<Option<FileSwap>, sqlx::Error> {
        let query = format!(
            "WITH old AS (
                SELECT id, stored_file_name FROM client_documents
                WHERE id = $1 AND is_deleted = false
                FOR UPDATE
             )
             UPDATE client_documents d SET
                file_name = $2,
                stored_file_name = $3,
                content_type = $4,
                file_size_bytes = $5,
                uploaded_by_id = $6,
                uploaded_at = NOW()
             FROM old
             WHERE d.id = old.id
             RETURNING {D_COLUMNS}, old.stored_file_name AS previous_stored_file_name"
        );
        sqlx::query_as::<_, FileSwap>(&query)
            .bind(id)
            .bind(&file.file_name)
            .bind(&file.stored_file_name)
            .bind(&file.content_type)
            .bind(file.file_size_bytes)
            .bind(file.uploaded_by_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear all file columns on a live document.
    ///
    /// `None` when the document is missing or deleted.
    pub async fn clear_file(pool: &PgPool, id: DbId) -> Result<Option<FileSwap>, sqlx::Error> {
        let query = format!(
            "WITH old AS (
                SELECT id, stored_file_name FROM client_documents
                WHERE id = $1 AND is_deleted = false
                FOR UPDATE
             )
             UPDATE client_documents d SET
                file_name = NULL,
                stored_file_name = NULL,
                content_type = NULL,
                file_size_bytes = NULL,
                uploaded_by_id = NULL,
                uploaded_at = NULL
             FROM old
             WHERE d.id = old.id
             RETURNING {D_COLUMNS}, old.stored_file_name AS previous_stored_file_name"
        );
        sqlx::query_as::<_, FileSwap>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a document by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE client_documents SET is_deleted = true WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
