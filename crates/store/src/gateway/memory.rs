//! In-memory gateway.
//!
//! Keeps rows in the same flat shapes as the Postgres tables and goes
//! through the same row translation, so a round trip through it exercises
//! everything but SQL. Foreign keys are emulated with `RESTRICT` semantics.
//! Faults can be queued per operation to simulate remote failures and hangs.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use greenlog_core::models::{
    CreatePersonnel, CreateProject, CreateTeam, CreateWorkLog, Personnel, Project, Team, WorkLog,
};
use greenlog_core::types::{EntityId, EntityKind};
use greenlog_db::models::{
    NewPersonnelRow, NewProjectRow, NewTeamRow, NewWorkLogRow, PersonnelRow, ProjectRow, TeamRow,
    WorkLogRow,
};

use crate::error::{GatewayFailure, Operation, PersistenceError};
use crate::gateway::{require_row, Gateway, WorkLogBulk};

/// How an injected fault manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The call returns a remote rejection.
    Fail,
    /// The call never completes.
    Stall,
}

#[derive(Default)]
struct Tables {
    projects: Vec<ProjectRow>,
    work_logs: Vec<WorkLogRow>,
    teams: Vec<TeamRow>,
    personnel: Vec<PersonnelRow>,
}

/// Gateway backed by process memory.
#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
    faults: Mutex<Vec<(Operation, EntityKind, Fault)>>,
    calls: Mutex<Vec<(Operation, EntityKind)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `operation` on `entity` fail or hang. Each fault fires once.
    pub fn inject(&self, operation: Operation, entity: EntityKind, fault: Fault) {
        lock(&self.faults).push((operation, entity, fault));
    }

    /// Every call received so far, including faulted ones.
    pub fn calls(&self) -> Vec<(Operation, EntityKind)> {
        lock(&self.calls).clone()
    }

    pub fn project_rows(&self) -> Vec<ProjectRow> {
        lock(&self.tables).projects.clone()
    }

    pub fn work_log_rows(&self) -> Vec<WorkLogRow> {
        lock(&self.tables).work_logs.clone()
    }

    pub fn team_rows(&self) -> Vec<TeamRow> {
        lock(&self.tables).teams.clone()
    }

    pub fn personnel_rows(&self) -> Vec<PersonnelRow> {
        lock(&self.tables).personnel.clone()
    }

    /// Write a row directly, bypassing translation. Lets tests seed data the
    /// application could not produce itself.
    pub fn seed_work_log(&self, row: WorkLogRow) {
        lock(&self.tables).work_logs.push(row);
    }

    /// Record the call and apply a queued fault, if any.
    async fn enter(&self, operation: Operation, entity: EntityKind) -> Result<(), PersistenceError> {
        lock(&self.calls).push((operation, entity));
        let fault = {
            let mut faults = lock(&self.faults);
            faults
                .iter()
                .position(|(op, kind, _)| *op == operation && *kind == entity)
                .map(|idx| faults.remove(idx).2)
        };
        match fault {
            None => Ok(()),
            Some(Fault::Fail) => Err(PersistenceError::new(
                operation,
                entity,
                GatewayFailure::Rejected("injected failure".to_string()),
            )),
            Some(Fault::Stall) => std::future::pending().await,
        }
    }

    fn rejected(operation: Operation, entity: EntityKind, reason: &str) -> PersistenceError {
        PersistenceError::new(operation, entity, GatewayFailure::Rejected(reason.to_string()))
    }
}

fn new_id() -> EntityId {
    EntityId::now_v7()
}

/// Replace the row with the same id, keeping its original `created_at`.
fn overwrite<R>(
    rows: &mut [R],
    mut row: R,
    id_of: impl Fn(&R) -> EntityId,
    keep: impl Fn(&R, &mut R),
) -> bool {
    match rows.iter_mut().find(|r| id_of(r) == id_of(&row)) {
        Some(slot) => {
            keep(slot, &mut row);
            *slot = row;
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<Project> for MemoryGateway {
    async fn load(&self) -> Result<Vec<Project>, PersistenceError> {
        self.enter(Operation::Load, EntityKind::Project).await?;
        Ok(self.project_rows().into_iter().map(Project::from).collect())
    }

    async fn create(&self, input: &CreateProject) -> Result<Project, PersistenceError> {
        self.enter(Operation::Create, EntityKind::Project).await?;
        let mut tables = lock(&self.tables);
        if let Some(team_id) = input.team {
            if !tables.teams.iter().any(|t| t.id == team_id) {
                return Err(Self::rejected(
                    Operation::Create,
                    EntityKind::Project,
                    "team_id references a missing team",
                ));
            }
        }
        let row = NewProjectRow::from(input).into_row(new_id(), Utc::now());
        tables.projects.push(row.clone());
        Ok(row.into())
    }

    async fn update(&self, project: &Project) -> Result<(), PersistenceError> {
        self.enter(Operation::Update, EntityKind::Project).await?;
        let mut tables = lock(&self.tables);
        let matched = overwrite(
            &mut tables.projects,
            ProjectRow::from(project),
            |r| r.id,
            |old, new| new.created_at = old.created_at,
        );
        require_row(matched, Operation::Update, EntityKind::Project)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        self.enter(Operation::Delete, EntityKind::Project).await?;
        let mut tables = lock(&self.tables);
        if tables.work_logs.iter().any(|l| l.project_id == Some(id)) {
            return Err(Self::rejected(
                Operation::Delete,
                EntityKind::Project,
                "work_logs still reference this project",
            ));
        }
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        require_row(
            tables.projects.len() < before,
            Operation::Delete,
            EntityKind::Project,
        )
    }
}

// ---------------------------------------------------------------------------
// Work logs
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<WorkLog> for MemoryGateway {
    async fn load(&self) -> Result<Vec<WorkLog>, PersistenceError> {
        self.enter(Operation::Load, EntityKind::WorkLog).await?;
        self.work_log_rows()
            .into_iter()
            .map(|row| {
                WorkLog::try_from(row).map_err(|e| {
                    PersistenceError::new(
                        Operation::Load,
                        EntityKind::WorkLog,
                        GatewayFailure::Translation(e),
                    )
                })
            })
            .collect()
    }

    async fn create(&self, input: &CreateWorkLog) -> Result<WorkLog, PersistenceError> {
        self.enter(Operation::Create, EntityKind::WorkLog).await?;
        let new_row = NewWorkLogRow::try_from(input).map_err(|e| {
            PersistenceError::new(
                Operation::Create,
                EntityKind::WorkLog,
                GatewayFailure::Translation(e),
            )
        })?;
        let mut tables = lock(&self.tables);
        if let Some(project_id) = new_row.project_id {
            if !tables.projects.iter().any(|p| p.id == project_id) {
                return Err(Self::rejected(
                    Operation::Create,
                    EntityKind::WorkLog,
                    "project_id references a missing project",
                ));
            }
        }
        let row = new_row.into_row(new_id(), Utc::now());
        tables.work_logs.push(row.clone());
        drop(tables);
        WorkLog::try_from(row).map_err(|e| {
            PersistenceError::new(
                Operation::Create,
                EntityKind::WorkLog,
                GatewayFailure::Translation(e),
            )
        })
    }

    async fn update(&self, log: &WorkLog) -> Result<(), PersistenceError> {
        self.enter(Operation::Update, EntityKind::WorkLog).await?;
        let mut tables = lock(&self.tables);
        let matched = overwrite(
            &mut tables.work_logs,
            WorkLogRow::from(log),
            |r| r.id,
            |old, new| new.created_at = old.created_at,
        );
        require_row(matched, Operation::Update, EntityKind::WorkLog)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        self.enter(Operation::Delete, EntityKind::WorkLog).await?;
        let mut tables = lock(&self.tables);
        let before = tables.work_logs.len();
        tables.work_logs.retain(|l| l.id != id);
        require_row(
            tables.work_logs.len() < before,
            Operation::Delete,
            EntityKind::WorkLog,
        )
    }
}

#[async_trait]
impl WorkLogBulk for MemoryGateway {
    async fn set_archived_by_project(
        &self,
        project_id: EntityId,
        archived: bool,
    ) -> Result<u64, PersistenceError> {
        self.enter(Operation::BulkArchive, EntityKind::WorkLog).await?;
        let mut tables = lock(&self.tables);
        let mut touched = 0;
        for row in tables
            .work_logs
            .iter_mut()
            .filter(|l| l.project_id == Some(project_id))
        {
            row.is_archived = archived;
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete_by_project(&self, project_id: EntityId) -> Result<u64, PersistenceError> {
        self.enter(Operation::BulkDelete, EntityKind::WorkLog).await?;
        let mut tables = lock(&self.tables);
        let before = tables.work_logs.len();
        tables.work_logs.retain(|l| l.project_id != Some(project_id));
        Ok((before - tables.work_logs.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<Team> for MemoryGateway {
    async fn load(&self) -> Result<Vec<Team>, PersistenceError> {
        self.enter(Operation::Load, EntityKind::Team).await?;
        Ok(self.team_rows().into_iter().map(Team::from).collect())
    }

    async fn create(&self, input: &CreateTeam) -> Result<Team, PersistenceError> {
        self.enter(Operation::Create, EntityKind::Team).await?;
        let row = NewTeamRow::from(input).into_row(new_id(), Utc::now());
        lock(&self.tables).teams.push(row.clone());
        Ok(row.into())
    }

    async fn update(&self, team: &Team) -> Result<(), PersistenceError> {
        self.enter(Operation::Update, EntityKind::Team).await?;
        let mut tables = lock(&self.tables);
        let matched = overwrite(
            &mut tables.teams,
            TeamRow::from(team),
            |r| r.id,
            |old, new| new.created_at = old.created_at,
        );
        require_row(matched, Operation::Update, EntityKind::Team)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        self.enter(Operation::Delete, EntityKind::Team).await?;
        let mut tables = lock(&self.tables);
        if tables.projects.iter().any(|p| p.team_id == Some(id)) {
            return Err(Self::rejected(
                Operation::Delete,
                EntityKind::Team,
                "projects still reference this team",
            ));
        }
        let before = tables.teams.len();
        tables.teams.retain(|t| t.id != id);
        require_row(
            tables.teams.len() < before,
            Operation::Delete,
            EntityKind::Team,
        )
    }
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<Personnel> for MemoryGateway {
    async fn load(&self) -> Result<Vec<Personnel>, PersistenceError> {
        self.enter(Operation::Load, EntityKind::Personnel).await?;
        Ok(self
            .personnel_rows()
            .into_iter()
            .map(Personnel::from)
            .collect())
    }

    async fn create(&self, input: &CreatePersonnel) -> Result<Personnel, PersistenceError> {
        self.enter(Operation::Create, EntityKind::Personnel).await?;
        let row = NewPersonnelRow::from(input).into_row(new_id(), Utc::now());
        lock(&self.tables).personnel.push(row.clone());
        Ok(row.into())
    }

    async fn update(&self, person: &Personnel) -> Result<(), PersistenceError> {
        self.enter(Operation::Update, EntityKind::Personnel).await?;
        let mut tables = lock(&self.tables);
        let matched = overwrite(
            &mut tables.personnel,
            PersonnelRow::from(person),
            |r| r.id,
            |old, new| new.created_at = old.created_at,
        );
        require_row(matched, Operation::Update, EntityKind::Personnel)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        self.enter(Operation::Delete, EntityKind::Personnel).await?;
        let mut tables = lock(&self.tables);
        let before = tables.personnel.len();
        tables.personnel.retain(|p| p.id != id);
        require_row(
            tables.personnel.len() < before,
            Operation::Delete,
            EntityKind::Personnel,
        )
    }
}
