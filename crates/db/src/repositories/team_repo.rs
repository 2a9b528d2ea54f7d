//! Repository for the `teams` table.

use greenlog_core::types::EntityId;
use sqlx::PgPool;

use crate::models::team::{NewTeamRow, TeamRow};

const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for teams.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTeamRow) -> Result<TeamRow, sqlx::Error> {
        let query = format!("INSERT INTO teams (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, TeamRow>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// List all teams in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<TeamRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, TeamRow>(&query).fetch_all(pool).await
    }

    /// Rename a team. Returns `false` if no row with `row.id` exists.
    pub async fn update(pool: &PgPool, row: &TeamRow) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE teams SET name = $2 WHERE id = $1")
            .bind(row.id)
            .bind(&row.name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a team by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
