pub mod auth;
pub mod client;
pub mod dashboard;
pub mod document;
pub mod file;
pub mod health;
pub mod incident;
pub mod job_time;
pub mod metadata;
pub mod user;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout
/// /auth/me                                 current user
/// /auth/change-password                    change own password
///
/// /user                                    list, create (admin)
/// /user/staff                              assignment picker
/// /user/{id}                               get, update, delete
/// /user/{id}/reset-password                reset password (admin)
///
/// /client                                  list, create
/// /client/{id}                             get, update, delete
/// /client/{id}/assign                      assign / unassign staff (admin)
///
/// /jobtime                                 list, create
/// /jobtime/{id}                            get, update, delete
///
/// /incident                                list, create
/// /incident/{id}                           get, update, delete
/// /incident/{id}/status                    change status (admin)
///
/// /document                                list, create
/// /document/{id}                           get, update, delete
/// /document/client/{client_id}             documents of one client
///
/// /file/upload/{document_id}               multipart upload
/// /file/download/{document_id}             streamed download
/// /file/{document_id}                      remove file (admin)
///
/// /dashboard/summary                       aggregate counts
/// /dashboard/recent-incidents              newest incidents
/// /dashboard/upcoming-deadlines            documents due soon
///
/// /metadata                                all lookup categories
/// /metadata/refresh                        drop the catalog cache (admin)
/// /metadata/{category}                     one category
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/client", client::router())
        .nest("/jobtime", job_time::router())
        .nest("/incident", incident::router())
        .nest("/document", document::router())
        .nest("/file", file::router(config.max_upload_bytes))
        .nest("/dashboard", dashboard::router())
        .nest("/metadata", metadata::router())
}
