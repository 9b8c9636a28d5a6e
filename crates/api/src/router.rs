//! Application router: `/health`, the `/api` tree and the middleware stack
//! shared by `main.rs` and the integration tests.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Build the full application [`Router`].
///
/// Layers, outermost first: CORS, request id assignment, tracing, request id
/// echo, timeout (408), panic recovery (500). Body limits are set per route
/// group in [`routes::api_routes`] so only uploads accept large bodies.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes(config))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// CORS for the dashboard origins.
///
/// `Content-Disposition` is exposed so the browser can read download file
/// names, and `x-request-id` so the dashboard can quote it in bug reports.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.cors_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([CONTENT_DISPOSITION, REQUEST_ID_HEADER])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
