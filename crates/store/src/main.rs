use std::sync::Arc;

use chrono::{Datelike, Utc};
use greenlog_core::query;
use greenlog_events::EventBus;
use greenlog_store::{PgGateway, StoreConfig, Stores};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenlog_store=debug,greenlog_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StoreConfig::from_env()?;

    let pool = greenlog_db::create_pool(config.require_database_url()?, config.max_connections)
        .await?;
    tracing::info!("Database connection pool created");

    greenlog_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    greenlog_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let bus = Arc::new(EventBus::new(config.event_bus_capacity));
    let stores = Stores::new(Arc::new(PgGateway::new(pool)), bus, &config);
    stores.load_all().await?;
    tracing::info!(
        projects = stores.projects.len(),
        work_logs = stores.work_logs.len(),
        teams = stores.teams.len(),
        personnel = stores.personnel.len(),
        "Collections loaded"
    );

    let now = Utc::now();
    let work_logs = stores.work_logs.get_all();
    for project in stores.projects.get_all().iter().filter(|p| !p.is_archived) {
        let progress = query::contract_progress(project, &work_logs, now.year());
        tracing::info!(
            project = %project.name,
            visits = query::total_visits(&work_logs, project.id),
            hours = query::total_hours(&work_logs, project.id),
            last_visit = ?query::last_visit_date(&work_logs, project.id),
            days_since_last_visit = ?query::days_since_last_visit(&work_logs, project.id, now),
            visits_remaining = progress.visits_remaining,
            hours_remaining = progress.hours_remaining,
            "Project summary"
        );
    }

    let blank = query::blank_worksheets(&work_logs).len();
    let uninvoiced = query::uninvoiced(&work_logs).len();
    tracing::info!(blank_worksheets = blank, uninvoiced, "Work log summary");

    Ok(())
}
