//! Repository for the `incidents` table.

use careoffice_core::lookups::{IncidentStatus, Lookup};
use careoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::incident::{CreateIncident, Incident, IncidentFilter, UpdateIncident};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, reported_by_id, occurred_at, location, incident_type_id, \
                        severity_id, status_id, description, action_taken, resolved_at, \
                        created_at, updated_at";

/// [`COLUMNS`] qualified with the `i` alias, for queries joining `clients c`.
const I_COLUMNS: &str = "i.id, i.client_id, i.reported_by_id, i.occurred_at, i.location, \
                          i.incident_type_id, i.severity_id, i.status_id, i.description, \
                          i.action_taken, i.resolved_at, i.created_at, i.updated_at";

/// Shared WHERE clause for [`IncidentRepo::list`] and [`IncidentRepo::count`].
///
/// Expects `incidents i JOIN clients c`. Incidents of soft-deleted clients
/// are hidden. `$1` restricts to incidents the user reported or that concern
/// a client assigned to them.
const FILTER: &str = "i.is_deleted = false AND c.is_deleted = false
    AND ($1::BIGINT IS NULL OR i.reported_by_id = $1 OR c.assigned_staff_id = $1)
    AND ($2::BIGINT IS NULL OR i.client_id = $2)
    AND ($3::SMALLINT IS NULL OR i.status_id = $3)
    AND ($4::SMALLINT IS NULL OR i.severity_id = $4)";

/// Provides CRUD operations for incidents.
pub struct IncidentRepo;

impl IncidentRepo {
    /// Insert a new incident with status `Open`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateIncident) -> Result<Incident, sqlx::Error> {
        let query = format!(
            "INSERT INTO incidents (client_id, reported_by_id, occurred_at, location,
                incident_type_id, severity_id, status_id, description, action_taken)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(input.client_id)
            .bind(input.reported_by_id)
            .bind(input.occurred_at)
            .bind(&input.location)
            .bind(input.incident_type_id)
            .bind(input.severity_id)
            .bind(IncidentStatus::Open.id())
            .bind(&input.description)
            .bind(&input.action_taken)
            .fetch_one(pool)
            .await
    }

    /// Find an incident by ID. Excludes soft-deleted incidents and incidents
    /// of soft-deleted clients.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "SELECT {I_COLUMNS} FROM incidents i
             JOIN clients c ON c.id = i.client_id
             WHERE i.id = $1 AND i.is_deleted = false AND c.is_deleted = false"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List incidents matching `filter`, most recent occurrence first.
    pub async fn list(
        pool: &PgPool,
        filter: &IncidentFilter,
    ) -> Result<Vec<Incident>, sqlx::Error> {
        let query = format!(
            "SELECT {I_COLUMNS} FROM incidents i
             JOIN clients c ON c.id = i.client_id
             WHERE {FILTER}
             ORDER BY i.occurred_at DESC, i.id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(filter.visible_to)
            .bind(filter.client_id)
            .bind(filter.status_id)
            .bind(filter.severity_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Count incidents matching `filter` (ignores limit/offset).
    pub async fn count(pool: &PgPool, filter: &IncidentFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM incidents i
             JOIN clients c ON c.id = i.client_id
             WHERE {FILTER}"
        );
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.visible_to)
            .bind(filter.client_id)
            .bind(filter.status_id)
            .bind(filter.severity_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update an incident's details. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIncident,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "UPDATE incidents SET
                occurred_at = COALESCE($2, occurred_at),
                location = COALESCE($3, location),
                incident_type_id = COALESCE($4, incident_type_id),
                severity_id = COALESCE($5, severity_id),
                description = COALESCE($6, description),
                action_taken = COALESCE($7, action_taken)
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(input.occurred_at)
            .bind(&input.location)
            .bind(input.incident_type_id)
            .bind(input.severity_id)
            .bind(&input.description)
            .bind(&input.action_taken)
            .fetch_optional(pool)
            .await
    }

    /// Move an incident to `status`.
    ///
    /// Terminal statuses stamp `resolved_at` unless it is already set;
    /// non-terminal statuses clear it.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: IncidentStatus,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "UPDATE incidents SET
                status_id = $2,
                resolved_at = CASE WHEN $3 THEN COALESCE(resolved_at, NOW()) ELSE NULL END
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(status.id())
            .bind(status.is_terminal())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an incident by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE incidents SET is_deleted = true WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
