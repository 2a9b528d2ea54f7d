//! `personnel` row shape.

use greenlog_core::models::{CreatePersonnel, Personnel};
use greenlog_core::types::{EntityId, Timestamp};
use sqlx::FromRow;

/// A row from the `personnel` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PersonnelRow {
    pub id: EntityId,
    pub name: String,
    pub position: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
}

/// Insert shape for `personnel`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPersonnelRow {
    pub name: String,
    pub position: Option<String>,
    pub active: bool,
}

impl NewPersonnelRow {
    pub fn into_row(self, id: EntityId, created_at: Timestamp) -> PersonnelRow {
        PersonnelRow {
            id,
            name: self.name,
            position: self.position,
            active: self.active,
            created_at,
        }
    }
}

impl From<&CreatePersonnel> for NewPersonnelRow {
    fn from(input: &CreatePersonnel) -> Self {
        Self {
            name: input.name.clone(),
            position: input.position.clone(),
            active: input.active,
        }
    }
}

impl From<&Personnel> for PersonnelRow {
    fn from(p: &Personnel) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            position: p.position.clone(),
            active: p.active,
            created_at: p.created_at,
        }
    }
}

impl From<PersonnelRow> for Personnel {
    fn from(row: PersonnelRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            position: row.position,
            active: row.active,
            created_at: row.created_at,
        }
    }
}
