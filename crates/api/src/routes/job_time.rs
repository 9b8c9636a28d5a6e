//! Route definitions for the `/jobtime` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::job_time;
use crate::state::AppState;

/// Routes mounted at `/jobtime`.
///
/// ```text
/// GET    /      -> list_job_times
/// POST   /      -> create_job_time
/// GET    /{id}  -> get_job_time
/// PUT    /{id}  -> update_job_time
/// DELETE /{id}  -> delete_job_time
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(job_time::list_job_times).post(job_time::create_job_time),
        )
        .route(
            "/{id}",
            get(job_time::get_job_time)
                .put(job_time::update_job_time)
                .delete(job_time::delete_job_time),
        )
}
