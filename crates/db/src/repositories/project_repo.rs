//! Repository for the `projects` table.

use greenlog_core::types::EntityId;
use sqlx::PgPool;

use crate::models::project::{NewProjectRow, ProjectRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, client_name, address, contact_name, contact_phone, \
     contact_email, annual_visits, annual_total_hours, visit_duration, start_date, end_date, \
     team_id, is_archived, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewProjectRow) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, client_name, address, contact_name, contact_phone,
                contact_email, annual_visits, annual_total_hours, visit_duration, start_date,
                end_date, team_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.name)
            .bind(&input.client_name)
            .bind(&input.address)
            .bind(&input.contact_name)
            .bind(&input.contact_phone)
            .bind(&input.contact_email)
            .bind(input.annual_visits)
            .bind(input.annual_total_hours)
            .bind(input.visit_duration)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.team_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }

    /// Overwrite every mutable column of a project.
    ///
    /// Returns `false` if no row with `row.id` exists.
    pub async fn update(pool: &PgPool, row: &ProjectRow) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET
                name = $2,
                client_name = $3,
                address = $4,
                contact_name = $5,
                contact_phone = $6,
                contact_email = $7,
                annual_visits = $8,
                annual_total_hours = $9,
                visit_duration = $10,
                start_date = $11,
                end_date = $12,
                team_id = $13,
                is_archived = $14
             WHERE id = $1",
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.client_name)
        .bind(&row.address)
        .bind(&row.contact_name)
        .bind(&row.contact_phone)
        .bind(&row.contact_email)
        .bind(row.annual_visits)
        .bind(row.annual_total_hours)
        .bind(row.visit_duration)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(row.team_id)
        .bind(row.is_archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a project by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
