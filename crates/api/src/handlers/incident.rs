//! Handlers for the `/incident` resource.
//!
//! Staff see incidents they reported plus incidents concerning clients
//! assigned to them. Status changes are admin-only.

use axum::extract::State;
use axum::http::StatusCode;
use careoffice_core::error::CoreError;
use careoffice_core::lookups::{
    parse_lookup, parse_optional_lookup, IncidentSeverity, IncidentStatus, IncidentType, LookupId,
};
use careoffice_core::types::DbId;
use careoffice_db::models::incident::{
    CreateIncident, CreateIncidentRequest, Incident, IncidentFilter, UpdateIncident,
};
use careoffice_db::models::page::Page;
use careoffice_db::repositories::{ClientRepo, IncidentRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::client::find_visible_client;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::resolve_page;
use crate::state::AppState;

/// Query parameters for `GET /incident`.
#[derive(Debug, Deserialize)]
pub struct IncidentListParams {
    pub client_id: Option<DbId>,
    pub status: Option<LookupId>,
    pub severity: Option<LookupId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `PUT /incident/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Incident status id (1 Open, 2 Under Review, 3 Resolved, 4 Closed).
    pub status: LookupId,
}

/// GET /api/incident
pub async fn list_incidents(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<IncidentListParams>,
) -> AppResult<Json<Page<Incident>>> {
    parse_optional_lookup::<IncidentStatus>(params.status)?;
    parse_optional_lookup::<IncidentSeverity>(params.severity)?;
    let (limit, offset) = resolve_page(params.limit, params.offset);

    let filter = IncidentFilter {
        visible_to: user.scope(),
        client_id: params.client_id,
        status_id: params.status,
        severity_id: params.severity,
        limit,
        offset,
    };
    let items = IncidentRepo::list(&state.pool, &filter).await?;
    let total = IncidentRepo::count(&state.pool, &filter).await?;

    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}

/// GET /api/incident/{id}
pub async fn get_incident(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Incident>> {
    let incident = find_visible_incident(&state, &user, id).await?;
    Ok(Json(incident))
}

/// POST /api/incident
///
/// Report an incident for a client the caller can see. The caller is the
/// reporter and the status starts as `Open`.
pub async fn create_incident(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateIncidentRequest>,
) -> AppResult<(StatusCode, Json<Incident>)> {
    input.validate()?;
    parse_lookup::<IncidentType>(input.incident_type_id)?;
    parse_lookup::<IncidentSeverity>(input.severity_id)?;
    find_visible_client(&state, &user, input.client_id).await?;

    let create_dto = CreateIncident {
        client_id: input.client_id,
        reported_by_id: user.user_id,
        occurred_at: input.occurred_at,
        location: input.location,
        incident_type_id: input.incident_type_id,
        severity_id: input.severity_id,
        description: input.description,
        action_taken: input.action_taken,
    };

    let incident = IncidentRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(
        incident_id = incident.id,
        client_id = incident.client_id,
        reported_by = user.user_id,
        "Incident reported"
    );
    Ok((StatusCode::CREATED, Json(incident)))
}

/// PUT /api/incident/{id}
///
/// Reporter or admin only.
pub async fn update_incident(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIncident>,
) -> AppResult<Json<Incident>> {
    input.validate()?;
    let existing = find_visible_incident(&state, &user, id).await?;
    if !user.is_admin() && existing.reported_by_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the reporter or an admin may edit this incident".into(),
        )));
    }
    parse_optional_lookup::<IncidentType>(input.incident_type_id)?;
    parse_optional_lookup::<IncidentSeverity>(input.severity_id)?;

    let incident = IncidentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        }))?;
    Ok(Json(incident))
}

/// PUT /api/incident/{id}/status
///
/// Resolved and Closed stamp `resolved_at`; Open and Under Review clear it.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<Incident>> {
    let status = parse_lookup::<IncidentStatus>(input.status)?;

    let incident = IncidentRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        }))?;

    tracing::info!(incident_id = id, status = ?status, changed_by = admin.user_id, "Incident status changed");
    Ok(Json(incident))
}

/// DELETE /api/incident/{id}
pub async fn delete_incident(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if IncidentRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        }))
    }
}

/// Load an incident the caller may see, or 404.
async fn find_visible_incident(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Incident> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Incident",
            id,
        })
    };

    let incident = IncidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let Some(staff_id) = user.scope() else {
        return Ok(incident);
    };
    if incident.reported_by_id == staff_id
        || ClientRepo::is_assigned_to(&state.pool, incident.client_id, staff_id).await?
    {
        Ok(incident)
    } else {
        Err(not_found())
    }
}
