//! Handlers for the `/user` resource (staff account management).
//!
//! Everything here is admin-only except the staff picker and reading your
//! own profile.

use axum::extract::State;
use axum::http::StatusCode;
use careoffice_core::error::CoreError;
use careoffice_core::roles::ALL_ROLES;
use careoffice_core::types::DbId;
use careoffice_db::models::page::Page;
use careoffice_db::models::role::Role;
use careoffice_db::models::user::{
    CreateUser, StaffSummary, UpdateUser, User, UserFilter, UserResponse,
};
use careoffice_db::repositories::{ClientRepo, RoleRepo, SessionRepo, UserRepo};
use careoffice_db::UnitOfWork;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::resolve_page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /user`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    /// Role name, e.g. `staff`.
    pub role: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /user`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    /// Role name (`admin` or `staff`).
    pub role: String,
}

/// Request body for `PUT /user/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /user/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/user
///
/// List users (excluding deleted) with resolved role names.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let role_id = match params.role.as_deref() {
        Some(name) => Some(resolve_role_id(&state, name).await?),
        None => None,
    };
    let (limit, offset) = resolve_page(params.limit, params.offset);

    let filter = UserFilter {
        role_id,
        search: params.search.filter(|s| !s.trim().is_empty()),
        limit,
        offset,
    };
    let users = UserRepo::list(&state.pool, &filter).await?;
    let total = UserRepo::count(&state.pool, &filter).await?;

    // Pre-fetch all roles to avoid N+1 queries.
    let roles = RoleRepo::list(&state.pool).await?;

    Ok(Json(Page {
        items: users.iter().map(|u| to_response(u, &roles)).collect(),
        total,
        limit,
        offset,
    }))
}

/// GET /api/user/staff
///
/// Active users who can be assigned to clients, for pickers.
pub async fn list_staff(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<StaffSummary>>> {
    let staff = UserRepo::list_assignable(&state.pool, ALL_ROLES).await?;
    Ok(Json(staff))
}

/// GET /api/user/{id}
///
/// Admins may read any user; everyone else only themselves.
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    if !caller.is_admin() && caller.user_id != id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only view your own profile".into(),
        )));
    }

    let user = find_user(&state, id).await?;
    let response = user_to_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/user
///
/// Create a new user. Validates the body and password strength, hashes the
/// password, and returns the created user with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role_id = resolve_role_id(&state, &input.role).await?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash: hashed,
        first_name: input.first_name,
        last_name: input.last_name,
        phone_number: input.phone_number,
        role_id,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");

    let response = user_to_response(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/user/{id}
///
/// Update profile fields, role or active flag (not the password).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    let role_id = match input.role.as_deref() {
        Some(name) => Some(resolve_role_id(&state, name).await?),
        None => None,
    };

    let update_dto = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone_number: input.phone_number,
        role_id,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let response = user_to_response(&state, &user).await?;
    Ok(Json(response))
}

/// DELETE /api/user/{id}
///
/// Soft-delete a user. Their clients become unassigned and their sessions
/// are revoked in the same transaction. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    if !UserRepo::soft_delete(uow.conn(), id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    let released = ClientRepo::unassign_all_for_staff(uow.conn(), id).await?;
    SessionRepo::revoke_all_for_user(uow.conn(), id).await?;
    uow.commit().await?;

    tracing::info!(user_id = id, released, deleted_by = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/user/{id}/reset-password
///
/// Admin-initiated password reset. The user's sessions are revoked.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    if !UserRepo::update_password(uow.conn(), id, &hashed).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(uow.conn(), id).await?;
    uow.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Map a role name to its id, rejecting unknown names with 400.
async fn resolve_role_id(state: &AppState, name: &str) -> AppResult<DbId> {
    RoleRepo::id_for_name(&state.pool, name.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation(format!("Unknown role '{name}'"))))
}

/// Convert a [`User`] row into a safe [`UserResponse`] by resolving the role name.
async fn user_to_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let role_name = RoleRepo::name_for_user(&state.pool, user.id).await?;
    Ok(UserResponse::from_user(user, role_name))
}

fn to_response(user: &User, roles: &[Role]) -> UserResponse {
    let role_name = roles
        .iter()
        .find(|r| r.id == user.role_id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    UserResponse::from_user(user, role_name)
}
