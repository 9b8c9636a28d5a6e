use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careoffice_api::background::session_cleanup;
use careoffice_api::config::ServerConfig;
use careoffice_api::router::build_app_router;
use careoffice_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "careoffice_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = careoffice_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    careoffice_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    careoffice_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        careoffice_api::bootstrap::ensure_admin(&pool, admin)
            .await
            .expect("Failed to bootstrap admin account");
    }

    // --- Session cleanup ---
    let cleanup_cancel = tokio_util::sync::CancellationToken::new();
    let cleanup_handle = tokio::spawn(session_cleanup::run(
        pool.clone(),
        session_cleanup::CLEANUP_INTERVAL,
        cleanup_cancel.clone(),
    ));

    // --- Router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState::new(pool, config.clone());

    // --- Upload directory ---
    state
        .storage
        .prepare()
        .await
        .expect("Failed to create upload directory");
    tracing::info!(upload_dir = %config.upload_dir.display(), "Upload directory ready");

    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // The signal handler cancels `shutdown`; axum then stops accepting
    // connections and in-flight requests get `shutdown_timeout` to drain.
    let shutdown = tokio_util::sync::CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => match result {
            Ok(()) => tracing::info!("Server stopped accepting connections, cleaning up"),
            Err(e) => tracing::error!(error = %e, "Server error"),
        },
        () = drain_deadline => tracing::warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Shutdown timeout elapsed with requests still in flight"
        ),
    }

    // --- Post-shutdown cleanup ---
    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Session cleanup job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
