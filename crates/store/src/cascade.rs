//! Cross-entity rules between projects, their work logs, and teams.
//!
//! These are the only entry points that change a project or team in a way
//! that also touches another entity type:
//!
//! - [`CascadeCoordinator::archive_project_cascade`]: the project's archive
//!   flag is committed first, then copied onto its work logs. The two steps
//!   are not atomic; a failure in the second leaves the project changed and
//!   is returned as [`StoreError::CascadeIncomplete`].
//! - [`CascadeCoordinator::delete_project_cascade`]: work logs are deleted
//!   first, then the project, so the remote foreign key never sees orphans.
//! - [`CascadeCoordinator::delete_team_guarded`]: refused while any project
//!   is assigned to the team.

use std::sync::Arc;
use std::time::Duration;

use greenlog_core::error::CoreError;
use greenlog_core::models::{Entity, Project, Team, WorkLog};
use greenlog_core::types::{EntityId, EntityKind};
use greenlog_events::{ChangeKind, StoreEvent};
use serde::Serialize;

use crate::error::{Operation, StoreError, StoreResult};
use crate::gateway::{bounded, WorkLogBulk};
use crate::store::EntityStore;

/// Outcome of a successful cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Local work logs archived, unarchived, or deleted along with the project.
    pub work_logs_affected: usize,
}

/// Sequences gateway calls and store mutations for the cascading operations.
pub struct CascadeCoordinator {
    projects: Arc<EntityStore<Project>>,
    work_logs: Arc<EntityStore<WorkLog>>,
    teams: Arc<EntityStore<Team>>,
    bulk: Arc<dyn WorkLogBulk>,
    timeout: Duration,
}

impl CascadeCoordinator {
    pub fn new(
        projects: Arc<EntityStore<Project>>,
        work_logs: Arc<EntityStore<WorkLog>>,
        teams: Arc<EntityStore<Team>>,
        bulk: Arc<dyn WorkLogBulk>,
        timeout: Duration,
    ) -> Self {
        Self {
            projects,
            work_logs,
            teams,
            bulk,
            timeout,
        }
    }

    /// Set a project's archive flag and make every one of its work logs follow.
    pub async fn archive_project_cascade(
        &self,
        project_id: EntityId,
        archived: bool,
    ) -> StoreResult<CascadeReport> {
        let mut project = self
            .projects
            .get_by_id(project_id)
            .ok_or_else(|| Project::not_found(project_id))?;
        project.is_archived = archived;
        self.projects.commit_update(project).await?;

        let propagated = bounded(
            self.timeout,
            Operation::BulkArchive,
            EntityKind::WorkLog,
            self.bulk.set_archived_by_project(project_id, archived),
        )
        .await;
        if let Err(source) = propagated {
            tracing::error!(
                %project_id,
                archived,
                error = %source,
                "Archive cascade incomplete, project change kept"
            );
            return Err(StoreError::CascadeIncomplete { project_id, source });
        }

        let affected = self
            .work_logs
            .patch_local(|l| l.belongs_to(project_id), |l| l.is_archived = archived);
        self.work_logs.publish(
            StoreEvent::new(EntityKind::WorkLog, ChangeKind::ArchiveCascaded)
                .with_entity(project_id)
                .with_affected(affected),
        );
        tracing::info!(%project_id, archived, work_logs = affected, "Archive cascade applied");

        Ok(CascadeReport {
            work_logs_affected: affected,
        })
    }

    /// Delete a project together with all of its work logs.
    pub async fn delete_project_cascade(&self, project_id: EntityId) -> StoreResult<CascadeReport> {
        if !self.projects.contains(project_id) {
            return Err(Project::not_found(project_id).into());
        }

        bounded(
            self.timeout,
            Operation::BulkDelete,
            EntityKind::WorkLog,
            self.bulk.delete_by_project(project_id),
        )
        .await?;
        let affected = self.work_logs.remove_local(|l| l.belongs_to(project_id));
        self.work_logs.publish(
            StoreEvent::new(EntityKind::WorkLog, ChangeKind::DeleteCascaded)
                .with_entity(project_id)
                .with_affected(affected),
        );

        if let Err(e) = self.projects.remove_confirmed(project_id).await {
            tracing::error!(
                %project_id,
                work_logs = affected,
                error = %e,
                "Project delete failed after its work logs were removed"
            );
            return Err(e);
        }
        tracing::info!(%project_id, work_logs = affected, "Project deleted with its work logs");

        Ok(CascadeReport {
            work_logs_affected: affected,
        })
    }

    /// Delete a team unless a project still references it.
    pub async fn delete_team_guarded(&self, team_id: EntityId) -> StoreResult<()> {
        if !self.teams.contains(team_id) {
            return Err(Team::not_found(team_id).into());
        }

        let in_use = self.projects.count_where(|p| p.team == Some(team_id));
        if in_use > 0 {
            tracing::debug!(%team_id, projects = in_use, "Refused to delete team in use");
            return Err(CoreError::ConstraintViolation(format!(
                "team {team_id} is assigned to {in_use} project(s)"
            ))
            .into());
        }

        self.teams.remove_confirmed(team_id).await
    }
}
