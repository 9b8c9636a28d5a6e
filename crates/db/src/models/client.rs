//! Client (care recipient) entity model and DTOs.

use careoffice_core::lookups::LookupId;
use careoffice_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A client row from the `clients` table, joined with the assigned staff
/// member's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub gender_id: LookupId,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub care_level_id: LookupId,
    pub medical_notes: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub assigned_staff_id: Option<DbId>,
    pub assigned_staff_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    /// Defaults to "prefer not to say" if omitted.
    pub gender_id: Option<LookupId>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    /// Defaults to 1 (Low) if omitted.
    pub care_level_id: Option<LookupId>,
    pub medical_notes: Option<String>,
    #[validate(length(max = 200))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 32))]
    pub emergency_contact_phone: Option<String>,
    pub assigned_staff_id: Option<DbId>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender_id: Option<LookupId>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub care_level_id: Option<LookupId>,
    pub medical_notes: Option<String>,
    #[validate(length(max = 200))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 32))]
    pub emergency_contact_phone: Option<String>,
}

/// Filters for the client list.
#[derive(Debug, Default)]
pub struct ClientFilter {
    /// When set, only clients assigned to this staff member are returned.
    pub assigned_to: Option<DbId>,
    /// Case-insensitive match against first or last name.
    pub search: Option<String>,
    pub care_level_id: Option<LookupId>,
    pub limit: i64,
    pub offset: i64,
}
