//! Application-side entity models and DTOs.
//!
//! Each submodule contains:
//! - The entity struct as the rest of the application sees it (nested groups)
//! - A create DTO submitted to the remote store
//! - An update DTO (all `Option` fields) merged onto the local entity

pub mod personnel;
pub mod project;
pub mod team;
pub mod work_log;

pub use personnel::{CreatePersonnel, Personnel, UpdatePersonnel};
pub use project::{Contact, Contract, CreateProject, Project, UpdateProject};
pub use team::{CreateTeam, Team, UpdateTeam};
pub use work_log::{
    CreateWorkLog, Irrigation, TimeTracking, UpdateWorkLog, WasteManagement, WorkLog,
};

use crate::error::CoreError;
use crate::types::{EntityId, EntityKind};

/// Behaviour shared by every synchronized entity type.
///
/// The store layer is generic over this trait; per-type business rules
/// (mandatory fields, forbidden transitions) live in the implementations.
pub trait Entity: Clone + std::fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Input accepted by `add`; the remote store assigns `id` and `created_at`.
    type Create: std::fmt::Debug + Send + Sync;

    /// Partial update merged onto an existing entity.
    type Patch: std::fmt::Debug + Send + Sync;

    fn id(&self) -> EntityId;

    /// Check mandatory fields before anything is sent to the remote store.
    fn validate_create(input: &Self::Create) -> Result<(), CoreError>;

    /// Check invariants of a fully merged entity.
    fn validate(&self) -> Result<(), CoreError>;

    /// Merge `patch` onto `self`. Fields left `None` are untouched.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Reject changes that must go through a cascade entry point instead of
    /// a plain update.
    fn check_transition(&self, _next: &Self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Parent whose archive flag this entity inherits, with the flag to set.
    fn archive_link(&mut self) -> Option<(EntityId, &mut bool)> {
        None
    }

    /// [`archive_link`](Self::archive_link) for an entity not yet created.
    fn create_archive_link(_input: &mut Self::Create) -> Option<(EntityId, &mut bool)> {
        None
    }

    fn not_found(id: EntityId) -> CoreError {
        CoreError::NotFound {
            entity: Self::KIND.label(),
            id,
        }
    }
}
