//! Incident entity model and DTOs.

use careoffice_core::lookups::LookupId;
use careoffice_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `incidents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Incident {
    pub id: DbId,
    pub client_id: DbId,
    pub reported_by_id: DbId,
    pub occurred_at: Timestamp,
    pub location: Option<String>,
    pub incident_type_id: LookupId,
    pub severity_id: LookupId,
    pub status_id: LookupId,
    pub description: String,
    pub action_taken: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for reporting an incident. The reporter is the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIncidentRequest {
    pub client_id: DbId,
    pub occurred_at: Timestamp,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub incident_type_id: LookupId,
    pub severity_id: LookupId,
    #[validate(length(min = 1, max = 4000, message = "Description is required"))]
    pub description: String,
    #[validate(length(max = 4000))]
    pub action_taken: Option<String>,
}

/// DTO for inserting an incident.
#[derive(Debug, Clone)]
pub struct CreateIncident {
    pub client_id: DbId,
    pub reported_by_id: DbId,
    pub occurred_at: Timestamp,
    pub location: Option<String>,
    pub incident_type_id: LookupId,
    pub severity_id: LookupId,
    pub description: String,
    pub action_taken: Option<String>,
}

/// DTO for updating an incident's details. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateIncident {
    pub occurred_at: Option<Timestamp>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub incident_type_id: Option<LookupId>,
    pub severity_id: Option<LookupId>,
    #[validate(length(min = 1, max = 4000, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(max = 4000))]
    pub action_taken: Option<String>,
}

/// Filters for the incident list.
#[derive(Debug, Default)]
pub struct IncidentFilter {
    /// When set, only incidents reported by this user or concerning clients
    /// assigned to them are returned.
    pub visible_to: Option<DbId>,
    pub client_id: Option<DbId>,
    pub status_id: Option<LookupId>,
    pub severity_id: Option<LookupId>,
    pub limit: i64,
    pub offset: i64,
}
