//! Handlers for `/dashboard`: aggregate counts and widget lists.
//!
//! Every figure is scoped to what the caller can see. Admin-only figures
//! read as zero for staff.

use axum::extract::State;
use careoffice_core::document_status::{determine_status, DocumentStatus};
use careoffice_core::job_time::minutes_to_hours;
use careoffice_core::pagination::clamp_limit;
use careoffice_core::roles::ROLE_STAFF;
use careoffice_core::types::Date;
use careoffice_db::models::dashboard::{DocumentStatusRow, RecentIncident, UpcomingDeadline};
use careoffice_db::repositories::{DashboardRepo, JobTimeRepo};
use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{Json, Query};
use crate::middleware::rbac::RequireAuth;
use crate::query::today;
use crate::state::AppState;

const DEFAULT_RECENT_INCIDENTS: i64 = 10;
const MAX_RECENT_INCIDENTS: i64 = 50;
const DEFAULT_DEADLINE_DAYS: i64 = 14;
const MAX_DEADLINE_DAYS: i64 = 365;

/// Response body for `GET /dashboard/summary`.
#[derive(Debug, Default, Serialize)]
pub struct DashboardSummary {
    pub total_clients: i64,
    pub unassigned_clients: i64,
    pub active_staff: i64,
    pub open_incidents: i64,
    pub incidents_last_30_days: i64,
    pub documents_overdue: i64,
    pub documents_pending: i64,
    pub documents_uploaded: i64,
    pub hours_this_week: f64,
}

/// Per-status document counts.
#[derive(Debug, Default, PartialEq, Eq)]
struct DocumentTally {
    overdue: i64,
    pending: i64,
    uploaded: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecentIncidentsParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingDeadlinesParams {
    pub days: Option<i64>,
}

/// GET /api/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DashboardSummary>> {
    let scope = user.scope();
    let today = today();

    let clients = DashboardRepo::client_counts(&state.pool, scope).await?;
    let incidents = DashboardRepo::incident_counts(&state.pool, scope).await?;
    let rows = DashboardRepo::document_status_rows(&state.pool, scope).await?;
    let docs = tally_documents(&rows, today);

    let (week_start, week_end) = week_bounds(today);
    let minutes =
        JobTimeRepo::worked_minutes_between(&state.pool, scope, week_start, week_end).await?;

    let (unassigned_clients, active_staff) = if user.is_admin() {
        (
            clients.unassigned,
            DashboardRepo::active_users_with_role(&state.pool, ROLE_STAFF).await?,
        )
    } else {
        (0, 0)
    };

    Ok(Json(DashboardSummary {
        total_clients: clients.total,
        unassigned_clients,
        active_staff,
        open_incidents: incidents.open,
        incidents_last_30_days: incidents.last_30_days,
        documents_overdue: docs.overdue,
        documents_pending: docs.pending,
        documents_uploaded: docs.uploaded,
        hours_this_week: minutes_to_hours(minutes),
    }))
}

/// GET /api/dashboard/recent-incidents
pub async fn recent_incidents(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<RecentIncidentsParams>,
) -> AppResult<Json<Vec<RecentIncident>>> {
    let limit = clamp_limit(params.limit, DEFAULT_RECENT_INCIDENTS, MAX_RECENT_INCIDENTS);
    let items = DashboardRepo::recent_incidents(&state.pool, user.scope(), limit).await?;
    Ok(Json(items))
}

/// GET /api/dashboard/upcoming-deadlines
///
/// Documents still missing a file whose deadline is within the next `days`
/// days, today included.
pub async fn upcoming_deadlines(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<UpcomingDeadlinesParams>,
) -> AppResult<Json<Vec<UpcomingDeadline>>> {
    let days = params
        .days
        .unwrap_or(DEFAULT_DEADLINE_DAYS)
        .clamp(0, MAX_DEADLINE_DAYS);
    let from = today();
    let to = from + Duration::days(days);

    let items = DashboardRepo::upcoming_deadlines(&state.pool, user.scope(), from, to).await?;
    Ok(Json(items))
}

fn tally_documents(rows: &[DocumentStatusRow], today: Date) -> DocumentTally {
    rows.iter()
        .fold(DocumentTally::default(), |mut tally, row| {
            match determine_status(row.deadline, row.has_file, today) {
                DocumentStatus::Overdue => tally.overdue += 1,
                DocumentStatus::Pending => tally.pending += 1,
                DocumentStatus::Upload => tally.uploaded += 1,
            }
            tally
        })
}

/// Monday through Sunday of the week containing `today`.
fn week_bounds(today: Date) -> (Date, Date) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2026-03-04 is a Wednesday.
        assert_eq!(
            week_bounds(date(2026, 3, 4)),
            (date(2026, 3, 2), date(2026, 3, 8))
        );
        assert_eq!(
            week_bounds(date(2026, 3, 2)),
            (date(2026, 3, 2), date(2026, 3, 8))
        );
        assert_eq!(
            week_bounds(date(2026, 3, 8)),
            (date(2026, 3, 2), date(2026, 3, 8))
        );
    }

    #[test]
    fn tally_uses_derived_status() {
        let today = date(2026, 3, 10);
        let rows = vec![
            DocumentStatusRow { deadline: date(2026, 3, 1), has_file: true },
            DocumentStatusRow { deadline: date(2026, 3, 9), has_file: false },
            DocumentStatusRow { deadline: today, has_file: true },
            DocumentStatusRow { deadline: today, has_file: false },
            DocumentStatusRow { deadline: date(2026, 4, 1), has_file: true },
        ];
        assert_eq!(
            tally_documents(&rows, today),
            DocumentTally { overdue: 2, pending: 2, uploaded: 1 }
        );
    }
}
