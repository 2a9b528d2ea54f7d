//! Repository for the `work_logs` table.
//!
//! Besides single-row CRUD, provides the `project_id`-filtered bulk
//! statements used by the archive and delete cascades.

use greenlog_core::types::EntityId;
use sqlx::PgPool;

use crate::models::work_log::{NewWorkLogRow, WorkLogRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, date, personnel, departure, arrival, end_time, \
     break_minutes, total_hours, water_consumption, irrigation, waste_management, tasks, notes, \
     invoiced, is_archived, created_at";

/// Provides CRUD and bulk operations for work logs.
pub struct WorkLogRepo;

impl WorkLogRepo {
    /// Insert a new work log, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewWorkLogRow) -> Result<WorkLogRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_logs (project_id, date, personnel, departure, arrival, end_time,
                break_minutes, total_hours, water_consumption, irrigation, waste_management,
                tasks, notes, invoiced, is_archived)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkLogRow>(&query)
            .bind(input.project_id)
            .bind(input.date)
            .bind(&input.personnel)
            .bind(input.departure)
            .bind(input.arrival)
            .bind(input.end_time)
            .bind(input.break_minutes)
            .bind(input.total_hours)
            .bind(input.water_consumption)
            .bind(&input.irrigation)
            .bind(&input.waste_management)
            .bind(&input.tasks)
            .bind(&input.notes)
            .bind(input.invoiced)
            .bind(input.is_archived)
            .fetch_one(pool)
            .await
    }

    /// List all work logs in insertion order, the order the stores append in.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkLogRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_logs ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, WorkLogRow>(&query).fetch_all(pool).await
    }

    /// List the work logs of one project in insertion order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: EntityId,
    ) -> Result<Vec<WorkLogRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_logs WHERE project_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, WorkLogRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every mutable column of a work log.
    ///
    /// Returns `false` if no row with `row.id` exists.
    pub async fn update(pool: &PgPool, row: &WorkLogRow) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_logs SET
                project_id = $2,
                date = $3,
                personnel = $4,
                departure = $5,
                arrival = $6,
                end_time = $7,
                break_minutes = $8,
                total_hours = $9,
                water_consumption = $10,
                irrigation = $11,
                waste_management = $12,
                tasks = $13,
                notes = $14,
                invoiced = $15,
                is_archived = $16
             WHERE id = $1",
        )
        .bind(row.id)
        .bind(row.project_id)
        .bind(row.date)
        .bind(&row.personnel)
        .bind(row.departure)
        .bind(row.arrival)
        .bind(row.end_time)
        .bind(row.break_minutes)
        .bind(row.total_hours)
        .bind(row.water_consumption)
        .bind(&row.irrigation)
        .bind(&row.waste_management)
        .bind(&row.tasks)
        .bind(&row.notes)
        .bind(row.invoiced)
        .bind(row.is_archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set `is_archived` on every work log of a project. Returns rows affected.
    pub async fn set_archived_by_project(
        pool: &PgPool,
        project_id: EntityId,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE work_logs SET is_archived = $2 WHERE project_id = $1")
            .bind(project_id)
            .bind(archived)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Permanently delete a work log by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_logs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every work log of a project. Returns rows affected.
    pub async fn delete_by_project(pool: &PgPool, project_id: EntityId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM work_logs WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
