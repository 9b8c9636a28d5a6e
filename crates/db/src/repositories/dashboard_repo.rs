//! Read-only aggregate queries backing the dashboard widgets.
//!
//! Every query takes a `scope`: `None` for admins (everything), or the
//! caller's user id for staff, which limits clients to those assigned to
//! them and incidents to those they can see.

use careoffice_core::lookups::{IncidentStatus, Lookup};
use careoffice_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::dashboard::{
    ClientCounts, DocumentStatusRow, IncidentCounts, RecentIncident, UpcomingDeadline,
};

/// Provides dashboard aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Total and unassigned live clients within `scope`.
    pub async fn client_counts(
        pool: &PgPool,
        scope: Option<DbId>,
    ) -> Result<ClientCounts, sqlx::Error> {
        sqlx::query_as::<_, ClientCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE assigned_staff_id IS NULL) AS unassigned
             FROM clients
             WHERE is_deleted = false
               AND ($1::BIGINT IS NULL OR assigned_staff_id = $1)",
        )
        .bind(scope)
        .fetch_one(pool)
        .await
    }

    /// Number of active, non-deleted users holding the given role.
    pub async fn active_users_with_role(pool: &PgPool, role: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE r.name = $1 AND u.is_active = true AND u.is_deleted = false",
        )
        .bind(role)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Open incidents and incidents that occurred in the last 30 days.
    ///
    /// "Open" means any non-terminal status (open or under review).
    pub async fn incident_counts(
        pool: &PgPool,
        scope: Option<DbId>,
    ) -> Result<IncidentCounts, sqlx::Error> {
        sqlx::query_as::<_, IncidentCounts>(
            "SELECT COUNT(*) FILTER (WHERE i.status_id IN ($2, $3)) AS open,
                    COUNT(*) FILTER (WHERE i.occurred_at >= NOW() - INTERVAL '30 days') AS last_30_days
             FROM incidents i
             JOIN clients c ON c.id = i.client_id
             WHERE i.is_deleted = false AND c.is_deleted = false
               AND ($1::BIGINT IS NULL OR i.reported_by_id = $1 OR c.assigned_staff_id = $1)",
        )
        .bind(scope)
        .bind(IncidentStatus::Open.id())
        .bind(IncidentStatus::UnderReview.id())
        .fetch_one(pool)
        .await
    }

    /// Deadline and file presence of every live document within `scope`.
    pub async fn document_status_rows(
        pool: &PgPool,
        scope: Option<DbId>,
    ) -> Result<Vec<DocumentStatusRow>, sqlx::Error> {
        sqlx::query_as::<_, DocumentStatusRow>(
            "SELECT d.deadline, (d.stored_file_name IS NOT NULL) AS has_file
             FROM client_documents d
             JOIN clients c ON c.id = d.client_id
             WHERE d.is_deleted = false AND c.is_deleted = false
               AND ($1::BIGINT IS NULL OR c.assigned_staff_id = $1)",
        )
        .bind(scope)
        .fetch_all(pool)
        .await
    }

    /// Most recent incidents within `scope`, newest first.
    pub async fn recent_incidents(
        pool: &PgPool,
        scope: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<RecentIncident>, sqlx::Error> {
        sqlx::query_as::<_, RecentIncident>(
            "SELECT i.id, i.client_id, c.first_name || ' ' || c.last_name AS client_name,
                    i.severity_id, i.status_id, i.occurred_at, i.description
             FROM incidents i
             JOIN clients c ON c.id = i.client_id
             WHERE i.is_deleted = false AND c.is_deleted = false
               AND ($1::BIGINT IS NULL OR i.reported_by_id = $1 OR c.assigned_staff_id = $1)
             ORDER BY i.occurred_at DESC, i.id DESC
             LIMIT $2",
        )
        .bind(scope)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Documents without a file whose deadline falls in `[from, to]`,
    /// earliest first.
    pub async fn upcoming_deadlines(
        pool: &PgPool,
        scope: Option<DbId>,
        from: Date,
        to: Date,
    ) -> Result<Vec<UpcomingDeadline>, sqlx::Error> {
        sqlx::query_as::<_, UpcomingDeadline>(
            "SELECT d.id AS document_id, d.client_id,
                    c.first_name || ' ' || c.last_name AS client_name,
                    d.title, d.deadline
             FROM client_documents d
             JOIN clients c ON c.id = d.client_id
             WHERE d.is_deleted = false AND c.is_deleted = false
               AND d.stored_file_name IS NULL
               AND d.deadline BETWEEN $2 AND $3
               AND ($1::BIGINT IS NULL OR c.assigned_staff_id = $1)
             ORDER BY d.deadline ASC, d.id ASC",
        )
        .bind(scope)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
