//! Startup bootstrap: make sure an administrator account exists.

use careoffice_core::roles::ROLE_ADMIN;
use careoffice_db::models::user::CreateUser;
use careoffice_db::repositories::{RoleRepo, UserRepo};
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("The admin role is missing; were migrations applied?")]
    MissingAdminRole,

    #[error("ADMIN_PASSWORD rejected: {0}")]
    WeakPassword(String),

    #[error("Password hashing error: {0}")]
    Hash(String),
}

/// Create the configured admin unless a user with that username already
/// exists (deleted users included). Returns whether an account was created.
pub async fn ensure_admin(pool: &PgPool, admin: &BootstrapAdmin) -> Result<bool, BootstrapError> {
    if UserRepo::find_by_username(pool, &admin.username)
        .await?
        .is_some()
    {
        tracing::debug!(username = %admin.username, "Bootstrap admin already exists");
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(BootstrapError::WeakPassword)?;
    let role_id = RoleRepo::id_for_name(pool, ROLE_ADMIN)
        .await?
        .ok_or(BootstrapError::MissingAdminRole)?;
    let password_hash =
        hash_password(&admin.password).map_err(|e| BootstrapError::Hash(e.to_string()))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
            phone_number: None,
            role_id,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(true)
}
