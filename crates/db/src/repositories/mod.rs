//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument and speak row shapes only.

pub mod personnel_repo;
pub mod project_repo;
pub mod team_repo;
pub mod work_log_repo;

pub use personnel_repo::PersonnelRepo;
pub use project_repo::ProjectRepo;
pub use team_repo::TeamRepo;
pub use work_log_repo::WorkLogRepo;
