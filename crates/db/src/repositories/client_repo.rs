//! Repository for the `clients` table.

use careoffice_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::client::{Client, ClientFilter, CreateClient, UpdateClient};

/// Projection over a row source aliased `c`, joined to the assigned user `u`.
const PROJECTION: &str = "c.id, c.first_name, c.last_name, c.date_of_birth, c.gender_id, c.email, \
    c.phone_number, c.address, c.care_level_id, c.medical_notes, c.emergency_contact_name, \
    c.emergency_contact_phone, c.assigned_staff_id, \
    u.first_name || ' ' || u.last_name AS assigned_staff_name, \
    c.created_at, c.updated_at";

/// Join clause resolving the assigned staff member's name.
const STAFF_JOIN: &str = "LEFT JOIN users u ON u.id = c.assigned_staff_id";

/// Shared WHERE clause for [`ClientRepo::list`] and [`ClientRepo::count`].
const FILTER: &str = "c.is_deleted = false
    AND ($1::BIGINT IS NULL OR c.assigned_staff_id = $1)
    AND ($2::TEXT IS NULL
         OR c.first_name ILIKE '%' || $2 || '%'
         OR c.last_name ILIKE '%' || $2 || '%')
    AND ($3::SMALLINT IS NULL OR c.care_level_id = $3)";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    ///
    /// Gender defaults to 4 (prefer not to say) and care level to 1 (Low).
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO clients (first_name, last_name, date_of_birth, gender_id, email,
                    phone_number, address, care_level_id, medical_notes, emergency_contact_name,
                    emergency_contact_phone, assigned_staff_id)
                VALUES ($1, $2, $3, COALESCE($4, 4), $5, $6, $7, COALESCE($8, 1), $9, $10, $11, $12)
                RETURNING *
             )
             SELECT {PROJECTION} FROM c {STAFF_JOIN}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.date_of_birth)
            .bind(input.gender_id)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.address)
            .bind(input.care_level_id)
            .bind(&input.medical_notes)
            .bind(&input.emergency_contact_name)
            .bind(&input.emergency_contact_phone)
            .bind(input.assigned_staff_id)
            .fetch_one(pool)
            .await
    }

    /// Find a client by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECTION} FROM clients c {STAFF_JOIN}
             WHERE c.id = $1 AND c.is_deleted = false"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients matching `filter`, ordered by last name then first name.
    pub async fn list(pool: &PgPool, filter: &ClientFilter) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECTION} FROM clients c {STAFF_JOIN}
             WHERE {FILTER}
             ORDER BY c.last_name ASC, c.first_name ASC, c.id ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(filter.assigned_to)
            .bind(&filter.search)
            .bind(filter.care_level_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Count clients matching `filter` (ignores limit/offset).
    pub async fn count(pool: &PgPool, filter: &ClientFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM clients c WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.assigned_to)
            .bind(&filter.search)
            .bind(filter.care_level_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE clients SET
                    first_name = COALESCE($2, first_name),
                    last_name = COALESCE($3, last_name),
                    date_of_birth = COALESCE($4, date_of_birth),
                    gender_id = COALESCE($5, gender_id),
                    email = COALESCE($6, email),
                    phone_number = COALESCE($7, phone_number),
                    address = COALESCE($8, address),
                    care_level_id = COALESCE($9, care_level_id),
                    medical_notes = COALESCE($10, medical_notes),
                    emergency_contact_name = COALESCE($11, emergency_contact_name),
                    emergency_contact_phone = COALESCE($12, emergency_contact_phone)
                WHERE id = $1 AND is_deleted = false
                RETURNING *
             )
             SELECT {PROJECTION} FROM c {STAFF_JOIN}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.date_of_birth)
            .bind(input.gender_id)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(&input.address)
            .bind(input.care_level_id)
            .bind(&input.medical_notes)
            .bind(&input.emergency_contact_name)
            .bind(&input.emergency_contact_phone)
            .fetch_optional(pool)
            .await
    }

    /// Set (or clear, with `None`) the assigned staff member.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn assign_staff(
        pool: &PgPool,
        id: DbId,
        staff_id: Option<DbId>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE clients SET assigned_staff_id = $2
                WHERE id = $1 AND is_deleted = false
                RETURNING *
             )
             SELECT {PROJECTION} FROM c {STAFF_JOIN}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear the assignment on every client assigned to `staff_id`.
    /// Returns the number of clients released.
    pub async fn unassign_all_for_staff<'e, E>(
        executor: E,
        staff_id: DbId,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE clients SET assigned_staff_id = NULL WHERE assigned_staff_id = $1",
        )
        .bind(staff_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Whether a live client is assigned to the given staff member.
    pub async fn is_assigned_to(
        pool: &PgPool,
        client_id: DbId,
        staff_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM clients
                 WHERE id = $1 AND assigned_staff_id = $2 AND is_deleted = false
             )",
        )
        .bind(client_id)
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Soft-delete a client by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET is_deleted = true WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
