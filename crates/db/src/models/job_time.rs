//! Job-time (shift log) entity model and DTOs.

use careoffice_core::job_time::{minutes_to_hours, worked_minutes};
use careoffice_core::lookups::LookupId;
use careoffice_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `job_times` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobTime {
    pub id: DbId,
    pub client_id: DbId,
    pub staff_id: DbId,
    pub work_date: Date,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub break_minutes: i32,
    pub job_type_id: LookupId,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A job-time entry with derived worked time.
#[derive(Debug, Clone, Serialize)]
pub struct JobTimeResponse {
    #[serde(flatten)]
    pub entry: JobTime,
    pub worked_minutes: i64,
    pub hours: f64,
}

impl From<JobTime> for JobTimeResponse {
    fn from(entry: JobTime) -> Self {
        let minutes = worked_minutes(entry.start_time, entry.end_time, entry.break_minutes);
        Self {
            entry,
            worked_minutes: minutes,
            hours: minutes_to_hours(minutes),
        }
    }
}

/// Request body for creating a job-time entry.
///
/// `staff_id` is only honoured for admins; staff always log for themselves.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobTimeRequest {
    pub client_id: DbId,
    pub staff_id: Option<DbId>,
    /// Defaults to the start time's date.
    pub work_date: Option<Date>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub break_minutes: Option<i32>,
    pub job_type_id: Option<LookupId>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for inserting a resolved job-time entry.
#[derive(Debug, Clone)]
pub struct CreateJobTime {
    pub client_id: DbId,
    pub staff_id: DbId,
    pub work_date: Date,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub break_minutes: i32,
    pub job_type_id: LookupId,
    pub description: Option<String>,
}

/// DTO for updating an existing job-time entry. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJobTime {
    pub work_date: Option<Date>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub break_minutes: Option<i32>,
    pub job_type_id: Option<LookupId>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Filters for the job-time list.
#[derive(Debug, Default)]
pub struct JobTimeFilter {
    pub client_id: Option<DbId>,
    pub staff_id: Option<DbId>,
    /// Inclusive lower bound on `work_date`.
    pub from: Option<Date>,
    /// Inclusive upper bound on `work_date`.
    pub to: Option<Date>,
    pub limit: i64,
    pub offset: i64,
}
