//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::Entity;
use crate::types::{EntityId, EntityKind, Timestamp};
use crate::validation::{
    require_non_blank, require_non_negative_f64, require_non_negative_i32, validate_date_range,
};

/// Site contact for a maintenance contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Contracted yearly workload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub annual_visits: i32,
    pub annual_total_hours: f64,
    /// Planned hours per visit.
    pub visit_duration: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Contract {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_negative_i32("annual_visits", self.annual_visits)?;
        require_non_negative_f64("annual_total_hours", self.annual_total_hours)?;
        require_non_negative_f64("visit_duration", self.visit_duration)?;
        validate_date_range(self.start_date, self.end_date)
    }
}

/// A maintenance project (one client site under contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub contact: Contact,
    pub contract: Contract,
    /// Owning team, if assigned.
    pub team: Option<EntityId>,
    pub is_archived: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new project. New projects always start unarchived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub contract: Contract,
    pub team: Option<EntityId>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// The archive flag is deliberately absent; it only changes through the
/// archive cascade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub name: Option<String>,
    pub client_name: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub contact: Option<Contact>,
    pub contract: Option<Contract>,
    pub team: Option<Option<EntityId>>,
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    type Create = CreateProject;
    type Patch = UpdateProject;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate_create(input: &CreateProject) -> Result<(), CoreError> {
        require_non_blank("name", &input.name)?;
        input.contract.validate()
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("name", &self.name)?;
        self.contract.validate()
    }

    fn apply_patch(&mut self, patch: UpdateProject) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(client_name) = patch.client_name {
            self.client_name = client_name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
        if let Some(contract) = patch.contract {
            self.contract = contract;
        }
        if let Some(team) = patch.team {
            self.team = team;
        }
    }

    fn check_transition(&self, next: &Self) -> Result<(), CoreError> {
        if self.is_archived != next.is_archived {
            return Err(CoreError::Validation(
                "project archive state can only change through the archive cascade".to_string(),
            ));
        }
        Ok(())
    }
}
