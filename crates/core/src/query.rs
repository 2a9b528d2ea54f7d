//! Read-side queries and aggregates over a work-log snapshot.
//!
//! Every function takes the current collection as an argument and keeps no
//! state of its own; callers pass `store.get_all()` (or any slice) each time.
//! Filters preserve the input order.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::{Project, WorkLog};
use crate::types::{EntityId, Timestamp};

const SECS_PER_DAY: i64 = 86_400;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Work logs attached to `project_id`.
pub fn by_project(work_logs: &[WorkLog], project_id: EntityId) -> Vec<&WorkLog> {
    work_logs.iter().filter(|l| l.belongs_to(project_id)).collect()
}

/// Work logs dated within calendar `year`.
pub fn by_year(work_logs: &[WorkLog], year: i32) -> Vec<&WorkLog> {
    work_logs.iter().filter(|l| l.date.year() == year).collect()
}

/// Work logs on any project currently assigned to `team_id`.
pub fn by_team<'a>(
    work_logs: &'a [WorkLog],
    projects: &[Project],
    team_id: EntityId,
) -> Vec<&'a WorkLog> {
    let team_projects: Vec<EntityId> = projects
        .iter()
        .filter(|p| p.team == Some(team_id))
        .map(|p| p.id)
        .collect();
    work_logs
        .iter()
        .filter(|l| l.project_id.is_some_and(|id| team_projects.contains(&id)))
        .collect()
}

/// Work logs listing `name` among their personnel (exact match).
pub fn by_personnel<'a>(work_logs: &'a [WorkLog], name: &str) -> Vec<&'a WorkLog> {
    work_logs
        .iter()
        .filter(|l| l.personnel.iter().any(|p| p == name))
        .collect()
}

/// Work logs not tied to any project.
pub fn blank_worksheets(work_logs: &[WorkLog]) -> Vec<&WorkLog> {
    work_logs.iter().filter(|l| l.is_blank_worksheet()).collect()
}

/// Work logs not yet invoiced.
pub fn uninvoiced(work_logs: &[WorkLog]) -> Vec<&WorkLog> {
    work_logs.iter().filter(|l| !l.invoiced).collect()
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Sum of billed hours for `project_id`. Zero when nothing matches.
pub fn total_hours(work_logs: &[WorkLog], project_id: EntityId) -> f64 {
    work_logs
        .iter()
        .filter(|l| l.belongs_to(project_id))
        .map(|l| l.time_tracking.total_hours)
        .sum()
}

/// Number of visits logged for `project_id`.
pub fn total_visits(work_logs: &[WorkLog], project_id: EntityId) -> usize {
    work_logs.iter().filter(|l| l.belongs_to(project_id)).count()
}

/// Most recent visit date for `project_id`, or `None` if it has no logs.
pub fn last_visit_date(work_logs: &[WorkLog], project_id: EntityId) -> Option<NaiveDate> {
    work_logs
        .iter()
        .filter(|l| l.belongs_to(project_id))
        .map(|l| l.date)
        .max()
}

/// Whole days elapsed from midnight UTC of `work_log_date` to `reference`.
///
/// Floors rather than rounds, so the count only increments once a full day
/// has passed. Negative when the log date is in the future.
pub fn days_since(reference: Timestamp, work_log_date: NaiveDate) -> i64 {
    let start = work_log_date.and_time(NaiveTime::MIN).and_utc();
    (reference - start).num_seconds().div_euclid(SECS_PER_DAY)
}

/// [`days_since`] applied to the project's [`last_visit_date`].
pub fn days_since_last_visit(
    work_logs: &[WorkLog],
    project_id: EntityId,
    reference: Timestamp,
) -> Option<i64> {
    last_visit_date(work_logs, project_id).map(|date| days_since(reference, date))
}

// ---------------------------------------------------------------------------
// Contract progress
// ---------------------------------------------------------------------------

/// Visits and hours logged in a year against the project's contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractProgress {
    pub year: i32,
    pub visits_done: usize,
    pub visits_planned: usize,
    pub visits_remaining: usize,
    pub hours_done: f64,
    pub hours_planned: f64,
    pub hours_remaining: f64,
}

/// Compare the logs of `project` dated in `year` with its contracted totals.
///
/// Remaining values saturate at zero when the contract is exceeded.
pub fn contract_progress(project: &Project, work_logs: &[WorkLog], year: i32) -> ContractProgress {
    let logs: Vec<&WorkLog> = work_logs
        .iter()
        .filter(|l| l.belongs_to(project.id) && l.date.year() == year)
        .collect();

    let visits_done = logs.len();
    let hours_done: f64 = logs.iter().map(|l| l.time_tracking.total_hours).sum();
    let visits_planned = usize::try_from(project.contract.annual_visits).unwrap_or(0);
    let hours_planned = project.contract.annual_total_hours;

    ContractProgress {
        year,
        visits_done,
        visits_planned,
        visits_remaining: visits_planned.saturating_sub(visits_done),
        hours_done,
        hours_planned,
        hours_remaining: (hours_planned - hours_done).max(0.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
