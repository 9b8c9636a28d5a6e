//! Handlers for the `/auth` resource (login, refresh, logout, profile).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use careoffice_core::error::CoreError;
use careoffice_db::models::session::NewSession;
use careoffice_db::models::user::{User, UserResponse};
use careoffice_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use careoffice_db::UnitOfWork;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Client details recorded on a refresh-token session.
struct ClientInfo {
    user_agent: Option<String>,
    ip_address: Option<String>,
}

impl ClientInfo {
    fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            user_agent: header("user-agent"),
            ip_address: header("x-forwarded-for")
                .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.can_sign_in() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::record_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after repeated failures");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let role = RoleRepo::name_for_user(&state.pool, user.id).await?;

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    UserRepo::record_successful_login(uow.conn(), user.id).await?;
    let response = issue_tokens(
        &state,
        &mut uow,
        &user,
        role,
        ClientInfo::from_headers(&headers),
    )
    .await?;
    uow.commit().await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for a new token pair. The presented session
/// is consumed and the replacement opened in the same transaction; a refused
/// refresh rolls back, leaving the token usable.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    let session = SessionRepo::redeem(uow.conn(), &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.can_sign_in() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let role = RoleRepo::name_for_user(&state.pool, user.id).await?;
    let response = issue_tokens(
        &state,
        &mut uow,
        &user,
        role,
        ClientInfo::from_headers(&headers),
    )
    .await?;
    uow.commit().await?;

    tracing::debug!(user_id = user.id, session_id = session.id, "Refresh token rotated");
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
///
/// The authenticated user's own profile.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    let role = RoleRepo::name_for_user(&state.pool, user.id).await?;
    Ok(Json(UserResponse::from_user(&user, role)))
}

/// POST /api/auth/change-password
///
/// Change the caller's own password. Every session is revoked, so other
/// devices must sign in again.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut uow = UnitOfWork::begin(&state.pool).await?;
    UserRepo::update_password(uow.conn(), user.id, &hashed).await?;
    SessionRepo::revoke_all_for_user(uow.conn(), user.id).await?;
    uow.commit().await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row inside `uow`, and
/// build the response.
async fn issue_tokens(
    state: &AppState,
    uow: &mut UnitOfWork,
    user: &User,
    role: String,
    client: ClientInfo,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let session = NewSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at: Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days),
        user_agent: client.user_agent,
        ip_address: client.ip_address,
    };
    SessionRepo::open(uow.conn(), &session).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from_user(user, role),
    })
}
