//! Integration tests for the Greenlog repositories.
//!
//! Exercises the repository layer against a real database:
//! - Insert/list round trips through the flat row shapes
//! - Full-row updates and the missing-row signal
//! - `project_id`-filtered bulk archive and delete
//! - Foreign keys protecting teams and projects still in use
//!
//! These need a Postgres server reachable through `DATABASE_URL`; run them
//! with `cargo test -p greenlog-db -- --ignored`.

use chrono::NaiveDate;
use greenlog_core::models::{CreateProject, CreateTeam, CreateWorkLog, TimeTracking};
use greenlog_core::types::EntityId;
use greenlog_db::models::{NewProjectRow, NewTeamRow, NewWorkLogRow};
use greenlog_db::repositories::{ProjectRepo, TeamRepo, WorkLogRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str, team_id: Option<EntityId>) -> NewProjectRow {
    NewProjectRow::from(&CreateProject {
        name: name.to_string(),
        team: team_id,
        ..Default::default()
    })
}

fn new_team(name: &str) -> NewTeamRow {
    NewTeamRow::from(&CreateTeam {
        name: name.to_string(),
    })
}

fn new_work_log(project_id: Option<EntityId>, hours: f64) -> NewWorkLogRow {
    NewWorkLogRow::try_from(&CreateWorkLog {
        project_id,
        date: NaiveDate::from_ymd_opt(2024, 5, 14),
        personnel: vec!["Marie".to_string()],
        time_tracking: TimeTracking {
            total_hours: hours,
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_create_and_find_project(pool: PgPool) {
    let created = ProjectRepo::create(&pool, &new_project("Parc Central", None))
        .await
        .unwrap();
    assert!(!created.is_archived);

    let found = ProjectRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found, Some(created));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_update_missing_row_returns_false(pool: PgPool) {
    let mut row = ProjectRepo::create(&pool, &new_project("Ghost", None))
        .await
        .unwrap();
    ProjectRepo::delete(&pool, row.id).await.unwrap();

    row.name = "Renamed".to_string();
    let updated = ProjectRepo::update(&pool, &row).await.unwrap();
    assert!(!updated, "update of a deleted row should report no match");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_list_returns_insertion_order(pool: PgPool) {
    let mut later_visit = new_work_log(None, 2.0);
    later_visit.date = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
    let mut earlier_visit = new_work_log(None, 1.0);
    earlier_visit.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

    let first = WorkLogRepo::create(&pool, &later_visit).await.unwrap();
    let second = WorkLogRepo::create(&pool, &earlier_visit).await.unwrap();

    let ids: Vec<_> = WorkLogRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let zeta = TeamRepo::create(&pool, &new_team("Zeta")).await.unwrap();
    let alpha = TeamRepo::create(&pool, &new_team("Alpha")).await.unwrap();
    let team_ids: Vec<_> = TeamRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(team_ids, vec![zeta.id, alpha.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_bulk_archive_only_touches_one_project(pool: PgPool) {
    let a = ProjectRepo::create(&pool, &new_project("A", None)).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("B", None)).await.unwrap();
    WorkLogRepo::create(&pool, &new_work_log(Some(a.id), 2.0)).await.unwrap();
    WorkLogRepo::create(&pool, &new_work_log(Some(a.id), 3.5)).await.unwrap();
    WorkLogRepo::create(&pool, &new_work_log(Some(b.id), 1.0)).await.unwrap();

    let affected = WorkLogRepo::set_archived_by_project(&pool, a.id, true)
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let a_logs = WorkLogRepo::list_by_project(&pool, a.id).await.unwrap();
    assert!(a_logs.iter().all(|l| l.is_archived));
    let b_logs = WorkLogRepo::list_by_project(&pool, b.id).await.unwrap();
    assert!(b_logs.iter().all(|l| !l.is_archived));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_delete_by_project_then_project(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Doomed", None))
        .await
        .unwrap();
    WorkLogRepo::create(&pool, &new_work_log(Some(project.id), 2.0))
        .await
        .unwrap();
    let blank = WorkLogRepo::create(&pool, &new_work_log(None, 1.0))
        .await
        .unwrap();

    // The foreign key refuses to orphan work logs.
    assert!(ProjectRepo::delete(&pool, project.id).await.is_err());

    let removed = WorkLogRepo::delete_by_project(&pool, project.id).await.unwrap();
    assert_eq!(removed, 1);
    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());

    let remaining = WorkLogRepo::list(&pool).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, blank.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_team_in_use_is_protected_by_foreign_key(pool: PgPool) {
    let team = TeamRepo::create(&pool, &new_team("Équipe Nord"))
        .await
        .unwrap();
    ProjectRepo::create(&pool, &new_project("Assigned", Some(team.id)))
        .await
        .unwrap();

    assert!(TeamRepo::delete(&pool, team.id).await.is_err());
    assert_eq!(TeamRepo::list(&pool).await.unwrap().len(), 1);
}
