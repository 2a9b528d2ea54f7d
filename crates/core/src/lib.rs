//! Domain types for the Greenlog maintenance-tracking core.
//!
//! - [`models`]: projects, work logs, teams and personnel as the application sees them
//! - [`query`]: pure aggregates over a work-log snapshot
//! - [`validation`]: field rules shared by the models

pub mod error;
pub mod models;
pub mod query;
pub mod types;
pub mod validation;
