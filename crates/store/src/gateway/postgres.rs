//! Postgres gateway built on the `greenlog-db` repositories.

use async_trait::async_trait;
use greenlog_core::models::{
    CreatePersonnel, CreateProject, CreateTeam, CreateWorkLog, Personnel, Project, Team, WorkLog,
};
use greenlog_core::types::{EntityId, EntityKind};
use greenlog_db::models::{
    NewPersonnelRow, NewProjectRow, NewTeamRow, NewWorkLogRow, PersonnelRow, ProjectRow, TeamRow,
    WorkLogRow,
};
use greenlog_db::repositories::{PersonnelRepo, ProjectRepo, TeamRepo, WorkLogRepo};
use greenlog_db::DbPool;

use crate::error::{GatewayFailure, Operation, PersistenceError};
use crate::gateway::{require_row, Gateway, WorkLogBulk};

/// Gateway speaking to the Postgres tables through a connection pool.
#[derive(Clone)]
pub struct PgGateway {
    pool: DbPool,
}

impl PgGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Wrap a sqlx error for the given call.
fn db_err(operation: Operation, entity: EntityKind) -> impl FnOnce(sqlx::Error) -> PersistenceError {
    move |e| PersistenceError::new(operation, entity, e)
}

fn translate_work_log(row: WorkLogRow, operation: Operation) -> Result<WorkLog, PersistenceError> {
    WorkLog::try_from(row).map_err(|e| {
        PersistenceError::new(operation, EntityKind::WorkLog, GatewayFailure::Translation(e))
    })
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<Project> for PgGateway {
    async fn load(&self) -> Result<Vec<Project>, PersistenceError> {
        let rows = ProjectRepo::list(&self.pool)
            .await
            .map_err(db_err(Operation::Load, EntityKind::Project))?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create(&self, input: &CreateProject) -> Result<Project, PersistenceError> {
        let row = ProjectRepo::create(&self.pool, &NewProjectRow::from(input))
            .await
            .map_err(db_err(Operation::Create, EntityKind::Project))?;
        Ok(row.into())
    }

    async fn update(&self, project: &Project) -> Result<(), PersistenceError> {
        let matched = ProjectRepo::update(&self.pool, &ProjectRow::from(project))
            .await
            .map_err(db_err(Operation::Update, EntityKind::Project))?;
        require_row(matched, Operation::Update, EntityKind::Project)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        let matched = ProjectRepo::delete(&self.pool, id)
            .await
            .map_err(db_err(Operation::Delete, EntityKind::Project))?;
        require_row(matched, Operation::Delete, EntityKind::Project)
    }
}

// ---------------------------------------------------------------------------
// Work logs
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<WorkLog> for PgGateway {
    async fn load(&self) -> Result<Vec<WorkLog>, PersistenceError> {
        let rows = WorkLogRepo::list(&self.pool)
            .await
            .map_err(db_err(Operation::Load, EntityKind::WorkLog))?;
        rows.into_iter()
            .map(|row| translate_work_log(row, Operation::Load))
            .collect()
    }

    async fn create(&self, input: &CreateWorkLog) -> Result<WorkLog, PersistenceError> {
        let new_row = NewWorkLogRow::try_from(input).map_err(|e| {
            PersistenceError::new(
                Operation::Create,
                EntityKind::WorkLog,
                GatewayFailure::Translation(e),
            )
        })?;
        let row = WorkLogRepo::create(&self.pool, &new_row)
            .await
            .map_err(db_err(Operation::Create, EntityKind::WorkLog))?;
        translate_work_log(row, Operation::Create)
    }

    async fn update(&self, log: &WorkLog) -> Result<(), PersistenceError> {
        let matched = WorkLogRepo::update(&self.pool, &WorkLogRow::from(log))
            .await
            .map_err(db_err(Operation::Update, EntityKind::WorkLog))?;
        require_row(matched, Operation::Update, EntityKind::WorkLog)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        let matched = WorkLogRepo::delete(&self.pool, id)
            .await
            .map_err(db_err(Operation::Delete, EntityKind::WorkLog))?;
        require_row(matched, Operation::Delete, EntityKind::WorkLog)
    }
}

#[async_trait]
impl WorkLogBulk for PgGateway {
    async fn set_archived_by_project(
        &self,
        project_id: EntityId,
        archived: bool,
    ) -> Result<u64, PersistenceError> {
        WorkLogRepo::set_archived_by_project(&self.pool, project_id, archived)
            .await
            .map_err(db_err(Operation::BulkArchive, EntityKind::WorkLog))
    }

    async fn delete_by_project(&self, project_id: EntityId) -> Result<u64, PersistenceError> {
        WorkLogRepo::delete_by_project(&self.pool, project_id)
            .await
            .map_err(db_err(Operation::BulkDelete, EntityKind::WorkLog))
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<Team> for PgGateway {
    async fn load(&self) -> Result<Vec<Team>, PersistenceError> {
        let rows = TeamRepo::list(&self.pool)
            .await
            .map_err(db_err(Operation::Load, EntityKind::Team))?;
        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn create(&self, input: &CreateTeam) -> Result<Team, PersistenceError> {
        let row = TeamRepo::create(&self.pool, &NewTeamRow::from(input))
            .await
            .map_err(db_err(Operation::Create, EntityKind::Team))?;
        Ok(row.into())
    }

    async fn update(&self, team: &Team) -> Result<(), PersistenceError> {
        let matched = TeamRepo::update(&self.pool, &TeamRow::from(team))
            .await
            .map_err(db_err(Operation::Update, EntityKind::Team))?;
        require_row(matched, Operation::Update, EntityKind::Team)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        let matched = TeamRepo::delete(&self.pool, id)
            .await
            .map_err(db_err(Operation::Delete, EntityKind::Team))?;
        require_row(matched, Operation::Delete, EntityKind::Team)
    }
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

#[async_trait]
impl Gateway<Personnel> for PgGateway {
    async fn load(&self) -> Result<Vec<Personnel>, PersistenceError> {
        let rows = PersonnelRepo::list(&self.pool)
            .await
            .map_err(db_err(Operation::Load, EntityKind::Personnel))?;
        Ok(rows.into_iter().map(Personnel::from).collect())
    }

    async fn create(&self, input: &CreatePersonnel) -> Result<Personnel, PersistenceError> {
        let row = PersonnelRepo::create(&self.pool, &NewPersonnelRow::from(input))
            .await
            .map_err(db_err(Operation::Create, EntityKind::Personnel))?;
        Ok(row.into())
    }

    async fn update(&self, person: &Personnel) -> Result<(), PersistenceError> {
        let matched = PersonnelRepo::update(&self.pool, &PersonnelRow::from(person))
            .await
            .map_err(db_err(Operation::Update, EntityKind::Personnel))?;
        require_row(matched, Operation::Update, EntityKind::Personnel)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError> {
        let matched = PersonnelRepo::delete(&self.pool, id)
            .await
            .map_err(db_err(Operation::Delete, EntityKind::Personnel))?;
        require_row(matched, Operation::Delete, EntityKind::Personnel)
    }
}
