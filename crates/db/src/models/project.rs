//! `projects` row shape.

use chrono::NaiveDate;
use greenlog_core::models::{Contact, Contract, CreateProject, Project};
use greenlog_core::types::{EntityId, Timestamp};
use sqlx::FromRow;

/// A row from the `projects` table. Contact and contract groups are flattened.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProjectRow {
    pub id: EntityId,
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub annual_visits: i32,
    pub annual_total_hours: f64,
    pub visit_duration: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub team_id: Option<EntityId>,
    pub is_archived: bool,
    pub created_at: Timestamp,
}

/// Insert shape for `projects`; `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProjectRow {
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub annual_visits: i32,
    pub annual_total_hours: f64,
    pub visit_duration: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub team_id: Option<EntityId>,
}

impl NewProjectRow {
    /// Materialize the row the database would return for this insert.
    pub fn into_row(self, id: EntityId, created_at: Timestamp) -> ProjectRow {
        ProjectRow {
            id,
            name: self.name,
            client_name: self.client_name,
            address: self.address,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            annual_visits: self.annual_visits,
            annual_total_hours: self.annual_total_hours,
            visit_duration: self.visit_duration,
            start_date: self.start_date,
            end_date: self.end_date,
            team_id: self.team_id,
            is_archived: false,
            created_at,
        }
    }
}

impl From<&CreateProject> for NewProjectRow {
    fn from(input: &CreateProject) -> Self {
        Self {
            name: input.name.clone(),
            client_name: input.client_name.clone(),
            address: input.address.clone(),
            contact_name: input.contact.name.clone(),
            contact_phone: input.contact.phone.clone(),
            contact_email: input.contact.email.clone(),
            annual_visits: input.contract.annual_visits,
            annual_total_hours: input.contract.annual_total_hours,
            visit_duration: input.contract.visit_duration,
            start_date: input.contract.start_date,
            end_date: input.contract.end_date,
            team_id: input.team,
        }
    }
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            client_name: p.client_name.clone(),
            address: p.address.clone(),
            contact_name: p.contact.name.clone(),
            contact_phone: p.contact.phone.clone(),
            contact_email: p.contact.email.clone(),
            annual_visits: p.contract.annual_visits,
            annual_total_hours: p.contract.annual_total_hours,
            visit_duration: p.contract.visit_duration,
            start_date: p.contract.start_date,
            end_date: p.contract.end_date,
            team_id: p.team,
            is_archived: p.is_archived,
            created_at: p.created_at,
        }
    }
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            client_name: row.client_name,
            address: row.address,
            contact: Contact {
                name: row.contact_name,
                phone: row.contact_phone,
                email: row.contact_email,
            },
            contract: Contract {
                annual_visits: row.annual_visits,
                annual_total_hours: row.annual_total_hours,
                visit_duration: row.visit_duration,
                start_date: row.start_date,
                end_date: row.end_date,
            },
            team: row.team_id,
            is_archived: row.is_archived,
            created_at: row.created_at,
        }
    }
}
