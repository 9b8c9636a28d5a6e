//! Repository for the `users` table.

use careoffice_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, StaffSummary, UpdateUser, User, UserFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, phone_number, \
                        role_id, is_active, is_deleted, last_login_at, failed_login_count, \
                        locked_until, created_at, updated_at";

/// Shared WHERE clause for [`UserRepo::list`] and [`UserRepo::count`].
const FILTER: &str = "is_deleted = false
    AND ($1::BIGINT IS NULL OR role_id = $1)
    AND ($2::TEXT IS NULL
         OR username ILIKE '%' || $2 || '%'
         OR email ILIKE '%' || $2 || '%'
         OR first_name ILIKE '%' || $2 || '%'
         OR last_name ILIKE '%' || $2 || '%')";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, phone_number, role_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone_number)
            .bind(input.role_id)
            .fetch_one(executor)
            .await
    }

    /// Find a user by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive), including soft-deleted rows
    /// so login can report the account state.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List users matching `filter`, ordered by last name then first name.
    pub async fn list(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {FILTER}
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(filter.role_id)
            .bind(&filter.search)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Count users matching `filter` (ignores limit/offset).
    pub async fn count(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM users WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.role_id)
            .bind(&filter.search)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Active, non-deleted users with one of the given role names, for
    /// client assignment pickers.
    pub async fn list_assignable(
        pool: &PgPool,
        role_names: &[&str],
    ) -> Result<Vec<StaffSummary>, sqlx::Error> {
        let names: Vec<String> = role_names.iter().map(|r| r.to_string()).collect();
        sqlx::query_as::<_, StaffSummary>(
            "SELECT u.id, u.username, u.first_name || ' ' || u.last_name AS full_name, r.name AS role
             FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.is_active = true AND u.is_deleted = false AND r.name = ANY($1)
             ORDER BY u.last_name ASC, u.first_name ASC",
        )
        .bind(&names)
        .fetch_all(pool)
        .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                phone_number = COALESCE($6, phone_number),
                role_id = COALESCE($7, role_id),
                is_active = COALESCE($8, is_active)
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone_number)
            .bind(input.role_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user: sets `is_deleted = true` and `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn soft_delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET is_deleted = true, is_active = false
             WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a failed login, returning the new consecutive-failure count.
    ///
    /// A lock that has already expired is cleared and the count restarts at 1,
    /// so an expired lock does not carry its failures into the next window.
    pub async fn record_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "UPDATE users SET
                failed_login_count = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= NOW() THEN 1
                    ELSE failed_login_count + 1
                END,
                locked_until = CASE
                    WHEN locked_until <= NOW() THEN NULL
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login<'e, E>(executor: E, id: DbId) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password<'e, E>(
        executor: E,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2 WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
