//! Periodic purge of expired and revoked refresh-token sessions.

use std::time::Duration;

use careoffice_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the session cleanup loop until `cancel` is triggered.
///
/// The first pass runs immediately on startup.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Session cleanup job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match SessionRepo::purge_stale(&pool).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
