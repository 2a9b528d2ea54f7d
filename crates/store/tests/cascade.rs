//! Integration tests for the cross-entity cascades.
//!
//! Covers:
//! - Archive and unarchive propagating from a project to its work logs
//! - A failed propagation surfacing as `CascadeIncomplete`
//! - Project deletion removing work logs first, then the project
//! - The team guard refusing to delete a team still assigned to a project

mod common;

use assert_matches::assert_matches;
use common::{build_stores, date, drain, project_input, seed_project, team_input, work_log_input};
use greenlog_core::error::CoreError;
use greenlog_core::models::{UpdateProject, UpdateWorkLog};
use greenlog_core::types::{EntityId, EntityKind};
use greenlog_events::ChangeKind;
use greenlog_store::{Change, Fault, Operation, StoreError};

// ---------------------------------------------------------------------------
// Archive cascade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_archive_cascade_marks_project_and_its_work_logs() {
    let (stores, gateway) = build_stores();
    let (_, project, logs) = seed_project(&stores, 3).await;
    let sheet = stores
        .work_logs
        .add(work_log_input(None, date(2024, 6, 12), 1.0))
        .await
        .unwrap();

    let report = stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap();

    assert_eq!(report.work_logs_affected, 3);
    assert!(stores.projects.get_by_id(project.id).unwrap().is_archived);
    for log in &logs {
        assert!(stores.work_logs.get_by_id(log.id).unwrap().is_archived);
    }
    assert!(!stores.work_logs.get_by_id(sheet.id).unwrap().is_archived);

    let remote = gateway.work_log_rows();
    assert!(remote
        .iter()
        .filter(|r| r.project_id == Some(project.id))
        .all(|r| r.is_archived));
    assert!(gateway.project_rows()[0].is_archived);
}

#[tokio::test]
async fn test_unarchive_cascade_restores_work_logs() {
    let (stores, _gateway) = build_stores();
    let (_, project, logs) = seed_project(&stores, 2).await;
    stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap();

    let report = stores
        .cascade
        .archive_project_cascade(project.id, false)
        .await
        .unwrap();

    assert_eq!(report.work_logs_affected, 2);
    assert!(!stores.projects.get_by_id(project.id).unwrap().is_archived);
    assert!(logs
        .iter()
        .all(|l| !stores.work_logs.get_by_id(l.id).unwrap().is_archived));
}

#[tokio::test]
async fn test_archive_cascade_without_work_logs() {
    let (stores, _gateway) = build_stores();
    let project = stores
        .projects
        .add(project_input("Parc de Parilly", None))
        .await
        .unwrap();

    let report = stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap();

    assert_eq!(report.work_logs_affected, 0);
    assert!(stores.projects.get_by_id(project.id).unwrap().is_archived);
}

#[tokio::test]
async fn test_archive_cascade_publishes_project_then_work_log_events() {
    let (stores, _gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 2).await;
    let mut rx = stores.subscribe();

    stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(
        (events[0].entity, events[0].change),
        (EntityKind::Project, ChangeKind::Updated)
    );
    assert_eq!(
        (events[1].entity, events[1].change),
        (EntityKind::WorkLog, ChangeKind::ArchiveCascaded)
    );
    assert_eq!(events[1].entity_id, Some(project.id));
    assert_eq!(events[1].affected, 2);
}

#[tokio::test]
async fn test_archive_cascade_failure_keeps_project_change() {
    let (stores, gateway) = build_stores();
    let (_, project, logs) = seed_project(&stores, 2).await;
    gateway.inject(Operation::BulkArchive, EntityKind::WorkLog, Fault::Fail);

    let err = stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap_err();

    assert_matches!(
        err,
        StoreError::CascadeIncomplete { project_id, .. } if project_id == project.id
    );
    assert!(stores.projects.get_by_id(project.id).unwrap().is_archived);
    assert!(logs
        .iter()
        .all(|l| !stores.work_logs.get_by_id(l.id).unwrap().is_archived));
}

#[tokio::test]
async fn test_archive_cascade_project_update_failure_changes_nothing() {
    let (stores, gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 1).await;
    gateway.inject(Operation::Update, EntityKind::Project, Fault::Fail);

    let err = stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Persistence(_));
    assert!(!stores.projects.get_by_id(project.id).unwrap().is_archived);
    assert!(!gateway
        .calls()
        .contains(&(Operation::BulkArchive, EntityKind::WorkLog)));
}

#[tokio::test]
async fn test_archive_cascade_unknown_project_is_not_found() {
    let (stores, gateway) = build_stores();

    let err = stores
        .cascade
        .archive_project_cascade(EntityId::new_v4(), true)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Project", .. }));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_work_log_added_to_archived_project_is_archived() {
    let (stores, gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 1).await;
    stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap();

    let log = stores
        .work_logs
        .add(work_log_input(Some(project.id), date(2024, 10, 7), 2.0))
        .await
        .unwrap();

    assert!(log.is_archived);
    assert!(stores.work_logs.get_by_id(log.id).unwrap().is_archived);
    let row = gateway
        .work_log_rows()
        .into_iter()
        .find(|r| r.id == log.id)
        .unwrap();
    assert!(row.is_archived);
}

#[tokio::test]
async fn test_work_log_added_to_active_project_is_not_archived() {
    let (stores, _gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 0).await;
    let mut input = work_log_input(Some(project.id), date(2024, 10, 8), 2.0);
    input.is_archived = true;

    let log = stores.work_logs.add(input).await.unwrap();

    assert!(!log.is_archived);
}

#[tokio::test]
async fn test_moved_work_log_takes_new_project_archive_flag() {
    let (stores, gateway) = build_stores();
    let (team, archived, logs) = seed_project(&stores, 1).await;
    let active = stores
        .projects
        .add(project_input("Parc des Hauteurs", Some(team.id)))
        .await
        .unwrap();
    stores
        .cascade
        .archive_project_cascade(archived.id, true)
        .await
        .unwrap();

    let moved = stores
        .work_logs
        .update(
            logs[0].id,
            Change::Patch(UpdateWorkLog {
                project_id: Some(Some(active.id)),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    assert!(!moved.is_archived);
    assert!(!gateway.work_log_rows()[0].is_archived);

    let moved_back = stores
        .work_logs
        .update(
            logs[0].id,
            Change::Patch(UpdateWorkLog {
                project_id: Some(Some(archived.id)),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    assert!(moved_back.is_archived);
    assert!(stores.work_logs.get_by_id(logs[0].id).unwrap().is_archived);
}

#[tokio::test]
async fn test_blank_worksheet_assigned_to_archived_project_is_archived() {
    let (stores, _gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 0).await;
    stores
        .cascade
        .archive_project_cascade(project.id, true)
        .await
        .unwrap();
    let sheet = stores
        .work_logs
        .add(work_log_input(None, date(2024, 11, 4), 1.0))
        .await
        .unwrap();
    assert!(!sheet.is_archived);

    let assigned = stores
        .work_logs
        .update(
            sheet.id,
            Change::Patch(UpdateWorkLog {
                project_id: Some(Some(project.id)),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

    assert!(assigned.is_archived);
}

// ---------------------------------------------------------------------------
// Delete cascade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_cascade_removes_project_and_its_work_logs() {
    let (stores, gateway) = build_stores();
    let (team, project, _) = seed_project(&stores, 2).await;
    let other = stores
        .projects
        .add(project_input("Parc de la Cerisaie", Some(team.id)))
        .await
        .unwrap();
    let kept = stores
        .work_logs
        .add(work_log_input(Some(other.id), date(2024, 9, 2), 2.0))
        .await
        .unwrap();

    let report = stores
        .cascade
        .delete_project_cascade(project.id)
        .await
        .unwrap();

    assert_eq!(report.work_logs_affected, 2);
    assert!(!stores.projects.contains(project.id));
    assert_eq!(stores.work_logs.get_all(), vec![kept]);
    assert_eq!(gateway.work_log_rows().len(), 1);
    assert_eq!(gateway.project_rows().len(), 1);

    let calls = gateway.calls();
    let bulk = calls
        .iter()
        .position(|c| *c == (Operation::BulkDelete, EntityKind::WorkLog))
        .unwrap();
    let delete = calls
        .iter()
        .position(|c| *c == (Operation::Delete, EntityKind::Project))
        .unwrap();
    assert!(bulk < delete, "work logs must be deleted before the project");
}

#[tokio::test]
async fn test_delete_cascade_publishes_work_logs_then_project() {
    let (stores, _gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 1).await;
    let mut rx = stores.subscribe();

    stores
        .cascade
        .delete_project_cascade(project.id)
        .await
        .unwrap();

    let kinds: Vec<_> = drain(&mut rx)
        .into_iter()
        .map(|e| (e.entity, e.change))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (EntityKind::WorkLog, ChangeKind::DeleteCascaded),
            (EntityKind::Project, ChangeKind::Removed),
        ]
    );
}

#[tokio::test]
async fn test_delete_cascade_bulk_failure_changes_nothing() {
    let (stores, gateway) = build_stores();
    let (_, project, logs) = seed_project(&stores, 2).await;
    gateway.inject(Operation::BulkDelete, EntityKind::WorkLog, Fault::Fail);

    let err = stores
        .cascade
        .delete_project_cascade(project.id)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Persistence(_));
    assert!(stores.projects.contains(project.id));
    assert_eq!(stores.work_logs.len(), logs.len());
    assert_eq!(gateway.work_log_rows().len(), logs.len());
}

#[tokio::test]
async fn test_delete_cascade_project_failure_keeps_project() {
    let (stores, gateway) = build_stores();
    let (_, project, _) = seed_project(&stores, 2).await;
    gateway.inject(Operation::Delete, EntityKind::Project, Fault::Fail);

    let err = stores
        .cascade
        .delete_project_cascade(project.id)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Persistence(_));
    assert!(stores.projects.contains(project.id));
    assert!(stores.work_logs.is_empty());
    assert!(gateway.work_log_rows().is_empty());
    assert_eq!(gateway.project_rows().len(), 1);
}

#[tokio::test]
async fn test_delete_cascade_unknown_project_is_not_found() {
    let (stores, gateway) = build_stores();

    let err = stores
        .cascade
        .delete_project_cascade(EntityId::new_v4())
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
    assert!(gateway.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Team guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_team_in_use_cannot_be_deleted() {
    let (stores, gateway) = build_stores();
    let (team, _, _) = seed_project(&stores, 0).await;

    let err = stores
        .cascade
        .delete_team_guarded(team.id)
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Core(CoreError::ConstraintViolation(_)));
    assert!(stores.teams.contains(team.id));
    assert!(!gateway
        .calls()
        .contains(&(Operation::Delete, EntityKind::Team)));
}

#[tokio::test]
async fn test_team_can_be_deleted_once_unassigned() {
    let (stores, gateway) = build_stores();
    let (team, project, _) = seed_project(&stores, 1).await;

    stores
        .projects
        .update(
            project.id,
            Change::Patch(UpdateProject {
                team: Some(None),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    stores.cascade.delete_team_guarded(team.id).await.unwrap();

    assert!(stores.teams.is_empty());
    assert!(gateway.team_rows().is_empty());
}

#[tokio::test]
async fn test_unused_team_is_deleted() {
    let (stores, _gateway) = build_stores();
    let team = stores.teams.add(team_input("Équipe Volante")).await.unwrap();
    let mut rx = stores.subscribe();

    stores.cascade.delete_team_guarded(team.id).await.unwrap();

    assert!(!stores.teams.contains(team.id));
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].change, ChangeKind::Removed);
    assert_eq!(events[0].entity_id, Some(team.id));
}

#[tokio::test]
async fn test_delete_unknown_team_is_not_found() {
    let (stores, _gateway) = build_stores();

    let err = stores
        .cascade
        .delete_team_guarded(EntityId::new_v4())
        .await
        .unwrap_err();

    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Team", .. }));
}
