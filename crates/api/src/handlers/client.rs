//! Handlers for the `/client` resource.
//!
//! Admins see every client. Staff see only clients assigned to them; any
//! other client reads as 404 so its existence is not leaked.

use axum::extract::State;
use axum::http::StatusCode;
use careoffice_core::error::CoreError;
use careoffice_core::lookups::{parse_optional_lookup, CareLevel, Gender, LookupId};
use careoffice_core::roles::is_known_role;
use careoffice_core::types::DbId;
use careoffice_db::models::client::{Client, ClientFilter, CreateClient, UpdateClient};
use careoffice_db::models::page::Page;
use careoffice_db::repositories::{ClientRepo, RoleRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::resolve_page;
use crate::state::AppState;

/// Query parameters for `GET /client`.
#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    pub search: Option<String>,
    pub care_level: Option<LookupId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `PUT /client/{id}/assign`. `null` unassigns.
#[derive(Debug, Deserialize)]
pub struct AssignStaffRequest {
    pub staff_id: Option<DbId>,
}

/// GET /api/client
pub async fn list_clients(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ClientListParams>,
) -> AppResult<Json<Page<Client>>> {
    parse_optional_lookup::<CareLevel>(params.care_level)?;
    let (limit, offset) = resolve_page(params.limit, params.offset);

    let filter = ClientFilter {
        assigned_to: user.scope(),
        search: params.search.filter(|s| !s.trim().is_empty()),
        care_level_id: params.care_level,
        limit,
        offset,
    };
    let items = ClientRepo::list(&state.pool, &filter).await?;
    let total = ClientRepo::count(&state.pool, &filter).await?;

    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /api/client/{id}
pub async fn get_client(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = find_visible_client(&state, &user, id).await?;
    Ok(Json(client))
}

/// POST /api/client
pub async fn create_client(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    input.validate()?;
    parse_optional_lookup::<Gender>(input.gender_id)?;
    parse_optional_lookup::<CareLevel>(input.care_level_id)?;
    if let Some(staff_id) = input.assigned_staff_id {
        ensure_assignable(&state, staff_id).await?;
    }

    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, created_by = admin.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /api/client/{id}
pub async fn update_client(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    input.validate()?;
    parse_optional_lookup::<Gender>(input.gender_id)?;
    parse_optional_lookup::<CareLevel>(input.care_level_id)?;

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// PUT /api/client/{id}/assign
///
/// Assign a staff member to the client, or unassign with `staff_id: null`.
pub async fn assign_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AssignStaffRequest>,
) -> AppResult<Json<Client>> {
    if let Some(staff_id) = input.staff_id {
        ensure_assignable(&state, staff_id).await?;
    }

    let client = ClientRepo::assign_staff(&state.pool, id, input.staff_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;

    tracing::info!(client_id = id, staff_id = ?input.staff_id, "Client assignment changed");
    Ok(Json(client))
}

/// DELETE /api/client/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a client the caller may see, or 404.
pub(crate) async fn find_visible_client(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Client> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        })
    };

    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    match user.scope() {
        Some(staff_id) if client.assigned_staff_id != Some(staff_id) => Err(not_found()),
        _ => Ok(client),
    }
}

/// Reject assignment targets that are not active staff or admin users.
async fn ensure_assignable(state: &AppState, staff_id: DbId) -> AppResult<()> {
    let invalid = || {
        AppError::Core(CoreError::Validation(format!(
            "User {staff_id} is not an active staff member"
        )))
    };

    let user = UserRepo::find_by_id(&state.pool, staff_id)
        .await?
        .ok_or_else(invalid)?;
    if !user.is_active {
        return Err(invalid());
    }

    let role = RoleRepo::name_for_user(&state.pool, user.id).await?;
    if !is_known_role(&role) {
        return Err(invalid());
    }
    Ok(())
}
