//! Repository for the `personnel` table.

use greenlog_core::types::EntityId;
use sqlx::PgPool;

use crate::models::personnel::{NewPersonnelRow, PersonnelRow};

const COLUMNS: &str = "id, name, position, active, created_at";

/// Provides CRUD operations for crew members.
pub struct PersonnelRepo;

impl PersonnelRepo {
    /// Insert a crew member, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewPersonnelRow,
    ) -> Result<PersonnelRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO personnel (name, position, active) VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PersonnelRow>(&query)
            .bind(&input.name)
            .bind(&input.position)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    /// List all crew members in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<PersonnelRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM personnel ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, PersonnelRow>(&query).fetch_all(pool).await
    }

    /// Overwrite a crew member. Returns `false` if no row with `row.id` exists.
    pub async fn update(pool: &PgPool, row: &PersonnelRow) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE personnel SET name = $2, position = $3, active = $4 WHERE id = $1")
                .bind(row.id)
                .bind(&row.name)
                .bind(&row.position)
                .bind(row.active)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a crew member. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM personnel WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
