//! `teams` row shape.

use greenlog_core::models::{CreateTeam, Team};
use greenlog_core::types::{EntityId, Timestamp};
use sqlx::FromRow;

/// A row from the `teams` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TeamRow {
    pub id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Insert shape for `teams`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeamRow {
    pub name: String,
}

impl NewTeamRow {
    pub fn into_row(self, id: EntityId, created_at: Timestamp) -> TeamRow {
        TeamRow {
            id,
            name: self.name,
            created_at,
        }
    }
}

impl From<&CreateTeam> for NewTeamRow {
    fn from(input: &CreateTeam) -> Self {
        Self {
            name: input.name.clone(),
        }
    }
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            created_at: team.created_at,
        }
    }
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}
