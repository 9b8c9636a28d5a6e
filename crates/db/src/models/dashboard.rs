//! Aggregate rows for the dashboard summary.

use careoffice_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Client head-counts within the caller's scope.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ClientCounts {
    pub total: i64,
    pub unassigned: i64,
}

/// Incident counts within the caller's scope.
#[derive(Debug, Clone, Default, FromRow)]
pub struct IncidentCounts {
    pub open: i64,
    pub last_30_days: i64,
}

/// The minimum needed to derive a document's status.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentStatusRow {
    pub deadline: Date,
    pub has_file: bool,
}

/// One line of the recent-incidents widget.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentIncident {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub severity_id: i16,
    pub status_id: i16,
    pub occurred_at: Timestamp,
    pub description: String,
}

/// One line of the upcoming-deadlines widget.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UpcomingDeadline {
    pub document_id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub title: String,
    pub deadline: Date,
}
