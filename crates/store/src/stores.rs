//! The full set of entity stores, built once and shared by reference.

use std::sync::Arc;

use greenlog_core::models::{Personnel, Project, Team, WorkLog};
use greenlog_events::{EventBus, StoreEvent};
use tokio::sync::broadcast;

use crate::cascade::CascadeCoordinator;
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::gateway::{Gateway, RemoteStore, WorkLogBulk};
use crate::store::EntityStore;

/// Every entity store plus the coordinator that links them.
///
/// Cheap to share: all members are behind `Arc`.
pub struct Stores {
    pub projects: Arc<EntityStore<Project>>,
    pub work_logs: Arc<EntityStore<WorkLog>>,
    pub teams: Arc<EntityStore<Team>>,
    pub personnel: Arc<EntityStore<Personnel>>,
    pub cascade: CascadeCoordinator,
    bus: Arc<EventBus>,
}

impl Stores {
    /// Wire the stores and coordinator to one remote backend. Collections
    /// start empty; call [`load_all`](Self::load_all) to populate them.
    pub fn new<R: RemoteStore>(remote: Arc<R>, bus: Arc<EventBus>, config: &StoreConfig) -> Self {
        let timeout = config.gateway_timeout;

        let project_gateway: Arc<dyn Gateway<Project>> = remote.clone();
        let work_log_gateway: Arc<dyn Gateway<WorkLog>> = remote.clone();
        let team_gateway: Arc<dyn Gateway<Team>> = remote.clone();
        let personnel_gateway: Arc<dyn Gateway<Personnel>> = remote.clone();
        let bulk: Arc<dyn WorkLogBulk> = remote;

        let projects = Arc::new(EntityStore::new(project_gateway, bus.clone(), timeout));
        let work_logs = Arc::new(
            EntityStore::new(work_log_gateway, bus.clone(), timeout)
                .with_archive_parent(projects.clone()),
        );
        let teams = Arc::new(EntityStore::new(team_gateway, bus.clone(), timeout));
        let personnel = Arc::new(EntityStore::new(personnel_gateway, bus.clone(), timeout));

        let cascade = CascadeCoordinator::new(
            projects.clone(),
            work_logs.clone(),
            teams.clone(),
            bulk,
            timeout,
        );

        Self {
            projects,
            work_logs,
            teams,
            personnel,
            cascade,
            bus,
        }
    }

    /// Reload every collection from the remote store, referenced types first.
    pub async fn load_all(&self) -> StoreResult<()> {
        self.teams.reload().await?;
        self.personnel.reload().await?;
        self.projects.reload().await?;
        self.work_logs.reload().await?;
        Ok(())
    }

    /// Receive a [`StoreEvent`] for every change applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}
