//! Staff/admin user entity model and DTOs.

use careoffice_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role_id: DbId,
    pub is_active: bool,
    pub is_deleted: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Active and not soft-deleted.
    pub fn can_sign_in(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    /// Resolved role name (e.g. `"admin"`, `"staff"`).
    pub role: String,
    pub role_id: DbId,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl UserResponse {
    /// Build a response from a user row and its pre-resolved role name.
    pub fn from_user(user: &User, role: String) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            phone_number: user.phone_number.clone(),
            role,
            role_id: user.role_id,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role_id: DbId,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Filters for the user list.
#[derive(Debug, Default)]
pub struct UserFilter {
    pub role_id: Option<DbId>,
    /// Case-insensitive match against username, email, first or last name.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Minimal staff entry for assignment pickers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffSummary {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub role: String,
}
