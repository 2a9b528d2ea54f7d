//! `work_logs` row shape.
//!
//! The nested `time_tracking` group is stored as discrete columns and the
//! tagged fields as text. Unknown tags fail translation rather than falling
//! back to a default.

use chrono::{NaiveDate, NaiveTime};
use greenlog_core::error::CoreError;
use greenlog_core::models::{
    CreateWorkLog, Irrigation, TimeTracking, WasteManagement, WorkLog,
};
use greenlog_core::types::{EntityId, Timestamp};
use sqlx::FromRow;

/// A row from the `work_logs` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkLogRow {
    pub id: EntityId,
    pub project_id: Option<EntityId>,
    pub date: NaiveDate,
    pub personnel: Vec<String>,
    pub departure: Option<NaiveTime>,
    pub arrival: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub break_minutes: i32,
    pub total_hours: f64,
    pub water_consumption: Option<f64>,
    pub irrigation: String,
    pub waste_management: String,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    pub invoiced: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
}

/// Insert shape for `work_logs`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkLogRow {
    pub project_id: Option<EntityId>,
    pub date: NaiveDate,
    pub personnel: Vec<String>,
    pub departure: Option<NaiveTime>,
    pub arrival: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub break_minutes: i32,
    pub total_hours: f64,
    pub water_consumption: Option<f64>,
    pub irrigation: String,
    pub waste_management: String,
    pub tasks: Option<String>,
    pub notes: Option<String>,
    pub invoiced: bool,
    pub is_archived: bool,
}

impl NewWorkLogRow {
    /// Materialize the row the database would return for this insert.
    pub fn into_row(self, id: EntityId, created_at: Timestamp) -> WorkLogRow {
        WorkLogRow {
            id,
            project_id: self.project_id,
            date: self.date,
            personnel: self.personnel,
            departure: self.departure,
            arrival: self.arrival,
            end_time: self.end_time,
            break_minutes: self.break_minutes,
            total_hours: self.total_hours,
            water_consumption: self.water_consumption,
            irrigation: self.irrigation,
            waste_management: self.waste_management,
            tasks: self.tasks,
            notes: self.notes,
            invoiced: self.invoiced,
            is_archived: self.is_archived,
            created_at,
        }
    }
}

impl TryFrom<&CreateWorkLog> for NewWorkLogRow {
    type Error = CoreError;

    fn try_from(input: &CreateWorkLog) -> Result<Self, CoreError> {
        let date = input
            .date
            .ok_or_else(|| CoreError::Validation("date is required".to_string()))?;
        Ok(Self {
            project_id: input.project_id,
            date,
            personnel: input.personnel.clone(),
            departure: input.time_tracking.departure,
            arrival: input.time_tracking.arrival,
            end_time: input.time_tracking.end,
            break_minutes: input.time_tracking.break_minutes,
            total_hours: input.time_tracking.total_hours,
            water_consumption: input.water_consumption,
            irrigation: input.irrigation.as_str().to_string(),
            waste_management: input.waste_management.as_str().to_string(),
            tasks: input.tasks.clone(),
            notes: input.notes.clone(),
            invoiced: input.invoiced,
            is_archived: input.is_archived,
        })
    }
}

impl From<&WorkLog> for WorkLogRow {
    fn from(log: &WorkLog) -> Self {
        Self {
            id: log.id,
            project_id: log.project_id,
            date: log.date,
            personnel: log.personnel.clone(),
            departure: log.time_tracking.departure,
            arrival: log.time_tracking.arrival,
            end_time: log.time_tracking.end,
            break_minutes: log.time_tracking.break_minutes,
            total_hours: log.time_tracking.total_hours,
            water_consumption: log.water_consumption,
            irrigation: log.irrigation.as_str().to_string(),
            waste_management: log.waste_management.as_str().to_string(),
            tasks: log.tasks.clone(),
            notes: log.notes.clone(),
            invoiced: log.invoiced,
            is_archived: log.is_archived,
            created_at: log.created_at,
        }
    }
}

impl TryFrom<WorkLogRow> for WorkLog {
    type Error = CoreError;

    fn try_from(row: WorkLogRow) -> Result<Self, CoreError> {
        let irrigation = Irrigation::from_tag(&row.irrigation).ok_or_else(|| {
            CoreError::Internal(format!(
                "work log {} has unknown irrigation tag '{}'",
                row.id, row.irrigation
            ))
        })?;
        let waste_management =
            WasteManagement::from_tag(&row.waste_management).ok_or_else(|| {
                CoreError::Internal(format!(
                    "work log {} has unknown waste management tag '{}'",
                    row.id, row.waste_management
                ))
            })?;

        Ok(Self {
            id: row.id,
            project_id: row.project_id,
            date: row.date,
            personnel: row.personnel,
            time_tracking: TimeTracking {
                departure: row.departure,
                arrival: row.arrival,
                end: row.end_time,
                break_minutes: row.break_minutes,
                total_hours: row.total_hours,
            },
            water_consumption: row.water_consumption,
            irrigation,
            waste_management,
            tasks: row.tasks,
            notes: row.notes,
            invoiced: row.invoiced,
            is_archived: row.is_archived,
            created_at: row.created_at,
        })
    }
}
