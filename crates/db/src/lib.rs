//! Persistence layer: connection pool, migrations, models and repositories.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod unit_of_work;

pub use unit_of_work::UnitOfWork;

pub type DbPool = sqlx::PgPool;

/// Maximum number of pooled connections.
const MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply every pending migration from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::debug!("Applying database migrations");
    sqlx::migrate!("./migrations").run(pool).await
}
