//! Handlers for `/metadata`, the lookup catalog used by dashboard dropdowns.

use axum::extract::State;
use axum::http::StatusCode;
use careoffice_core::lookups::LookupCategory;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// GET /api/metadata
pub async fn list_categories(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<Vec<LookupCategory>>> {
    let catalog = state.metadata.catalog(&state.pool).await?;
    Ok(Json(catalog.as_ref().clone()))
}

/// GET /api/metadata/{category}
pub async fn get_category(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(category): Path<String>,
) -> AppResult<Json<LookupCategory>> {
    state
        .metadata
        .category(&state.pool, &category)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown metadata category '{category}'")))
}

/// POST /api/metadata/refresh
pub async fn refresh(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> StatusCode {
    state.metadata.invalidate();
    tracing::info!(user_id = admin.user_id, "Metadata cache refreshed");
    StatusCode::NO_CONTENT
}
