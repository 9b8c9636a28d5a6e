//! Client document entity model and DTOs.

use careoffice_core::document_status::{determine_status, DocumentStatus};
use careoffice_core::lookups::LookupId;
use careoffice_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `client_documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientDocument {
    pub id: DbId,
    pub client_id: DbId,
    pub title: String,
    pub document_type_id: LookupId,
    pub deadline: Date,
    pub notes: Option<String>,
    pub file_name: Option<String>,
    /// On-disk name; internal only.
    #[serde(skip_serializing)]
    pub stored_file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub uploaded_at: Option<Timestamp>,
    pub uploaded_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClientDocument {
    pub fn has_file(&self) -> bool {
        self.stored_file_name.is_some()
    }

    pub fn status(&self, today: Date) -> DocumentStatus {
        determine_status(self.deadline, self.has_file(), today)
    }
}

/// A document plus its derived status.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDocumentResponse {
    #[serde(flatten)]
    pub document: ClientDocument,
    pub has_file: bool,
    pub status: DocumentStatus,
}

impl ClientDocumentResponse {
    pub fn new(document: ClientDocument, today: Date) -> Self {
        let status = document.status(today);
        Self {
            has_file: document.has_file(),
            document,
            status,
        }
    }
}

/// DTO for creating a document requirement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientDocument {
    pub client_id: DbId,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    /// Defaults to 6 (Other) if omitted.
    pub document_type_id: Option<LookupId>,
    pub deadline: Date,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO for updating a document requirement. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClientDocument {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub document_type_id: Option<LookupId>,
    pub deadline: Option<Date>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// File metadata recorded when an upload is attached to a document.
#[derive(Debug, Clone)]
pub struct AttachFile {
    pub file_name: String,
    pub stored_file_name: String,
    pub content_type: String,
    pub file_size_bytes: i64,
    pub uploaded_by_id: DbId,
}

/// A document after its file columns were replaced or cleared, with the
/// stored name they held immediately before.
#[derive(Debug, Clone, FromRow)]
pub struct FileSwap {
    #[sqlx(flatten)]
    pub document: ClientDocument,
    pub previous_stored_file_name: Option<String>,
}

/// Filters for the document list.
#[derive(Debug, Default)]
pub struct DocumentFilter {
    /// When set, only documents of clients assigned to this staff member.
    pub assigned_to: Option<DbId>,
    pub client_id: Option<DbId>,
}
