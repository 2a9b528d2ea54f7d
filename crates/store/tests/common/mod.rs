#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use greenlog_core::models::{
    Contract, CreatePersonnel, CreateProject, CreateTeam, CreateWorkLog, Project, Team,
    TimeTracking, WorkLog,
};
use greenlog_core::types::EntityId;
use greenlog_events::{EventBus, StoreEvent};
use greenlog_store::{MemoryGateway, StoreConfig, Stores};
use tokio::sync::broadcast;

/// Gateway timeout used by every test store. Short, so stalled calls fail fast.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(100);

/// Build a test `StoreConfig` with a short gateway timeout.
pub fn test_config() -> StoreConfig {
    StoreConfig {
        gateway_timeout: TEST_TIMEOUT,
        ..StoreConfig::default()
    }
}

/// Build stores over a fresh in-memory gateway, returning both so tests can
/// inspect remote rows and inject faults.
pub fn build_stores() -> (Stores, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let bus = Arc::new(EventBus::new(64));
    let stores = Stores::new(gateway.clone(), bus, &test_config());
    (stores, gateway)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn project_input(name: &str, team: Option<EntityId>) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        client_name: Some("Ville de Lyon".to_string()),
        contract: Contract {
            annual_visits: 12,
            annual_total_hours: 48.0,
            visit_duration: 4.0,
            ..Default::default()
        },
        team,
        ..Default::default()
    }
}

pub fn work_log_input(project_id: Option<EntityId>, on: NaiveDate, hours: f64) -> CreateWorkLog {
    CreateWorkLog {
        project_id,
        date: Some(on),
        personnel: vec!["Marie".to_string(), "Karim".to_string()],
        time_tracking: TimeTracking {
            break_minutes: 30,
            total_hours: hours,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn team_input(name: &str) -> CreateTeam {
    CreateTeam {
        name: name.to_string(),
    }
}

pub fn personnel_input(name: &str) -> CreatePersonnel {
    CreatePersonnel {
        name: name.to_string(),
        ..Default::default()
    }
}

/// A team, a project assigned to it, and `logs` work logs on that project.
pub async fn seed_project(stores: &Stores, logs: usize) -> (Team, Project, Vec<WorkLog>) {
    let team = stores.teams.add(team_input("Équipe Nord")).await.unwrap();
    let project = stores
        .projects
        .add(project_input("Parc de la Tête d'Or", Some(team.id)))
        .await
        .unwrap();
    let mut created = Vec::with_capacity(logs);
    for day in 0..logs {
        let log = stores
            .work_logs
            .add(work_log_input(
                Some(project.id),
                date(2024, 5, 1 + day as u32),
                3.5,
            ))
            .await
            .unwrap();
        created.push(log);
    }
    (team, project, created)
}

/// Drain every event currently buffered on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
