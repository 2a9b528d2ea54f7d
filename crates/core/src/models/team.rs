//! Team entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::Entity;
use crate::types::{EntityId, EntityKind, Timestamp};
use crate::validation::require_non_blank;

/// A field crew that projects are assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
}

/// DTO for updating an existing team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
}

impl Entity for Team {
    const KIND: EntityKind = EntityKind::Team;
    type Create = CreateTeam;
    type Patch = UpdateTeam;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate_create(input: &CreateTeam) -> Result<(), CoreError> {
        require_non_blank("name", &input.name)
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("name", &self.name)
    }

    fn apply_patch(&mut self, patch: UpdateTeam) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}
