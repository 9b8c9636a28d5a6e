//! Repository for the `roles` table.
//!
//! Roles are seeded by migration (`admin`, `staff`) and never written at
//! runtime, so this repository only maps between names, ids and users.

use careoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    /// Every role ordered by id; feeds the metadata catalog and user lists.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Id of the role called `name` (case-sensitive), if it exists.
    pub async fn id_for_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Role name of a user, deleted users included.
    ///
    /// Fails with `RowNotFound` when the user does not exist.
    pub async fn name_for_user(pool: &PgPool, user_id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.name FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
