//! Remote row shapes and their translation to application models.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the table row (flat, snake_case)
//! - A `New*Row` insert shape built from the create DTO
//! - Conversions row → model (reading) and model → row (updates)

pub mod personnel;
pub mod project;
pub mod team;
pub mod work_log;

pub use personnel::{NewPersonnelRow, PersonnelRow};
pub use project::{NewProjectRow, ProjectRow};
pub use team::{NewTeamRow, TeamRow};
pub use work_log::{NewWorkLogRow, WorkLogRow};
