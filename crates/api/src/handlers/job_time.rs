//! Handlers for the `/jobtime` resource (shift logs).
//!
//! Staff log and see only their own entries, and only against clients
//! assigned to them. Admins see everything and may log for any staff member.

use axum::extract::State;
use axum::http::StatusCode;
use careoffice_core::error::CoreError;
use careoffice_core::job_time::validate_shift;
use careoffice_core::lookups::{parse_optional_lookup, JobType, Lookup};
use careoffice_core::types::{Date, DbId};
use careoffice_db::models::job_time::{
    CreateJobTime, CreateJobTimeRequest, JobTime, JobTimeFilter, JobTimeResponse, UpdateJobTime,
};
use careoffice_db::models::page::Page;
use careoffice_db::repositories::{JobTimeRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::handlers::client::find_visible_client;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::resolve_page;
use crate::state::AppState;

/// Query parameters for `GET /jobtime`.
#[derive(Debug, Deserialize)]
pub struct JobTimeListParams {
    pub client_id: Option<DbId>,
    /// Ignored for staff callers, who always see their own entries.
    pub staff_id: Option<DbId>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/jobtime
pub async fn list_job_times(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<JobTimeListParams>,
) -> AppResult<Json<Page<JobTimeResponse>>> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return Err(AppError::BadRequest("'from' must not be after 'to'".into()));
        }
    }
    let (limit, offset) = resolve_page(params.limit, params.offset);

    let filter = JobTimeFilter {
        client_id: params.client_id,
        staff_id: user.scope().or(params.staff_id),
        from: params.from,
        to: params.to,
        limit,
        offset,
    };
    let entries = JobTimeRepo::list(&state.pool, &filter).await?;
    let total = JobTimeRepo::count(&state.pool, &filter).await?;

    Ok(Json(Page {
        items: entries.into_iter().map(JobTimeResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// GET /api/jobtime/{id}
pub async fn get_job_time(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<JobTimeResponse>> {
    let entry = find_visible_entry(&state, &user, id).await?;
    Ok(Json(entry.into()))
}

/// POST /api/jobtime
pub async fn create_job_time(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateJobTimeRequest>,
) -> AppResult<(StatusCode, Json<JobTimeResponse>)> {
    input.validate()?;

    let staff_id = match (user.is_admin(), input.staff_id) {
        (true, Some(other)) => {
            let target = UserRepo::find_by_id(&state.pool, other).await?;
            if !target.is_some_and(|u| u.is_active) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "User {other} is not an active staff member"
                ))));
            }
            other
        }
        (false, Some(other)) if other != user.user_id => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff may only log time for themselves".into(),
            )));
        }
        _ => user.user_id,
    };

    // Staff may only log against their own clients; the lookup 404s otherwise.
    find_visible_client(&state, &user, input.client_id).await?;

    let break_minutes = input.break_minutes.unwrap_or(0);
    validate_shift(input.start_time, input.end_time, break_minutes)?;
    let job_type = parse_optional_lookup::<JobType>(input.job_type_id)?
        .unwrap_or(JobType::PersonalCare);

    let create_dto = CreateJobTime {
        client_id: input.client_id,
        staff_id,
        work_date: input
            .work_date
            .unwrap_or_else(|| input.start_time.date_naive()),
        start_time: input.start_time,
        end_time: input.end_time,
        break_minutes,
        job_type_id: job_type.id(),
        description: input.description,
    };

    let entry = JobTimeRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(
        job_time_id = entry.id,
        staff_id,
        client_id = entry.client_id,
        "Job time logged"
    );
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// PUT /api/jobtime/{id}
///
/// Owner or admin only. The merged start/end/break is re-validated.
pub async fn update_job_time(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJobTime>,
) -> AppResult<Json<JobTimeResponse>> {
    input.validate()?;
    let existing = find_visible_entry(&state, &user, id).await?;

    validate_shift(
        input.start_time.unwrap_or(existing.start_time),
        input.end_time.unwrap_or(existing.end_time),
        input.break_minutes.unwrap_or(existing.break_minutes),
    )?;
    parse_optional_lookup::<JobType>(input.job_type_id)?;

    let entry = JobTimeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "JobTime",
            id,
        }))?;
    Ok(Json(entry.into()))
}

/// DELETE /api/jobtime/{id}
pub async fn delete_job_time(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_visible_entry(&state, &user, id).await?;
    if JobTimeRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "JobTime",
            id,
        }))
    }
}

/// Load an entry the caller owns (or any entry, for admins), or 404.
async fn find_visible_entry(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<JobTime> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "JobTime",
            id,
        })
    };

    let entry = JobTimeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    match user.scope() {
        Some(staff_id) if entry.staff_id != staff_id => Err(not_found()),
        _ => Ok(entry),
    }
}
