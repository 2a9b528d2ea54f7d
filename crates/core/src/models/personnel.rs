//! Personnel entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::Entity;
use crate::types::{EntityId, EntityKind, Timestamp};
use crate::validation::require_non_blank;

/// A crew member. Work logs refer to personnel by `name`, not by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personnel {
    pub id: EntityId,
    pub name: String,
    pub position: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a crew member. Active unless stated otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonnel {
    pub name: String,
    pub position: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for CreatePersonnel {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: None,
            active: default_active(),
        }
    }
}

/// DTO for updating a crew member. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonnel {
    pub name: Option<String>,
    pub position: Option<Option<String>>,
    pub active: Option<bool>,
}

impl Entity for Personnel {
    const KIND: EntityKind = EntityKind::Personnel;
    type Create = CreatePersonnel;
    type Patch = UpdatePersonnel;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate_create(input: &CreatePersonnel) -> Result<(), CoreError> {
        require_non_blank("name", &input.name)
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("name", &self.name)
    }

    fn apply_patch(&mut self, patch: UpdatePersonnel) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
    }
}
