//! Liveness endpoint for load balancers and the dashboard status badge.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database and upload storage are both usable, else
    /// `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub storage_ready: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (db, storage_ready) = tokio::join!(
        careoffice_db::health_check(&state.pool),
        state.storage.is_ready()
    );
    let db_healthy = db.is_ok();
    if let Err(e) = &db {
        tracing::warn!(error = %e, "Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy && storage_ready { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        storage_ready,
    })
}

/// `/health` sits at the root, outside `/api` and its auth.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
