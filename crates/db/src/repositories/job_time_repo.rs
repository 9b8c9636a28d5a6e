//! Repository for the `job_times` table.

use careoffice_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::job_time::{CreateJobTime, JobTime, JobTimeFilter, UpdateJobTime};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, staff_id, work_date, start_time, end_time, break_minutes, \
                        job_type_id, description, created_at, updated_at";

/// Shared WHERE clause for [`JobTimeRepo::list`] and [`JobTimeRepo::count`].
const FILTER: &str = "is_deleted = false
    AND ($1::BIGINT IS NULL OR client_id = $1)
    AND ($2::BIGINT IS NULL OR staff_id = $2)
    AND ($3::DATE IS NULL OR work_date >= $3)
    AND ($4::DATE IS NULL OR work_date <= $4)";

/// Provides CRUD operations for job-time entries.
pub struct JobTimeRepo;

impl JobTimeRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateJobTime) -> Result<JobTime, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_times (client_id, staff_id, work_date, start_time, end_time,
                break_minutes, job_type_id, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobTime>(&query)
            .bind(input.client_id)
            .bind(input.staff_id)
            .bind(input.work_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.break_minutes)
            .bind(input.job_type_id)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JobTime>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM job_times WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, JobTime>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries matching `filter`, newest shift first.
    pub async fn list(pool: &PgPool, filter: &JobTimeFilter) -> Result<Vec<JobTime>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_times WHERE {FILTER}
             ORDER BY start_time DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, JobTime>(&query)
            .bind(filter.client_id)
            .bind(filter.staff_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Count entries matching `filter` (ignores limit/offset).
    pub async fn count(pool: &PgPool, filter: &JobTimeFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM job_times WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.client_id)
            .bind(filter.staff_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update an entry. Only non-`None` fields in `input` are applied.
    ///
    /// Callers validate the merged shift before calling; the table's range
    /// check still rejects an end before the start.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateJobTime,
    ) -> Result<Option<JobTime>, sqlx::Error> {
        let query = format!(
            "UPDATE job_times SET
                work_date = COALESCE($2, work_date),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                break_minutes = COALESCE($5, break_minutes),
                job_type_id = COALESCE($6, job_type_id),
                description = COALESCE($7, description)
             WHERE id = $1 AND is_deleted = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobTime>(&query)
            .bind(id)
            .bind(input.work_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.break_minutes)
            .bind(input.job_type_id)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an entry by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE job_times SET is_deleted = true WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total worked minutes (span minus break) for entries dated within
    /// `[from, to]`, optionally limited to one staff member.
    pub async fn worked_minutes_between(
        pool: &PgPool,
        staff_id: Option<DbId>,
        from: Date,
        to: Date,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(GREATEST(
                        FLOOR(EXTRACT(EPOCH FROM (end_time - start_time)) / 60) - break_minutes,
                        0
                    )), 0)::BIGINT
             FROM job_times
             WHERE is_deleted = false
               AND ($1::BIGINT IS NULL OR staff_id = $1)
               AND work_date BETWEEN $2 AND $3",
        )
        .bind(staff_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
