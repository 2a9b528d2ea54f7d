//! Translation/transport boundary between in-memory entities and the remote
//! row store.
//!
//! Gateways hold no application state: they turn models into rows, issue
//! the call, and turn rows back into models. Business rules are checked by
//! the stores before a gateway is ever reached.

pub mod memory;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use greenlog_core::models::{Entity, Personnel, Project, Team, WorkLog};
use greenlog_core::types::{EntityId, EntityKind};

use crate::error::{GatewayFailure, Operation, PersistenceError};

pub use memory::{Fault, MemoryGateway};
pub use postgres::PgGateway;

/// CRUD transport for one entity type.
#[async_trait]
pub trait Gateway<E: Entity>: Send + Sync {
    /// Fetch every remote row of this type.
    async fn load(&self) -> Result<Vec<E>, PersistenceError>;

    /// Insert a row; the returned entity carries the remote-assigned id and
    /// creation timestamp.
    async fn create(&self, input: &E::Create) -> Result<E, PersistenceError>;

    /// Overwrite the row with `entity.id()`.
    async fn update(&self, entity: &E) -> Result<(), PersistenceError>;

    async fn delete(&self, id: EntityId) -> Result<(), PersistenceError>;
}

/// `project_id`-filtered work-log statements used by the cascades.
#[async_trait]
pub trait WorkLogBulk: Send + Sync {
    /// Set the archive flag on every work log of a project. Returns rows touched.
    async fn set_archived_by_project(
        &self,
        project_id: EntityId,
        archived: bool,
    ) -> Result<u64, PersistenceError>;

    /// Delete every work log of a project. Returns rows removed.
    async fn delete_by_project(&self, project_id: EntityId) -> Result<u64, PersistenceError>;
}

/// A backend able to serve all four collections plus the bulk statements.
pub trait RemoteStore:
    Gateway<Project> + Gateway<WorkLog> + Gateway<Team> + Gateway<Personnel> + WorkLogBulk + 'static
{
}

impl<T> RemoteStore for T where
    T: Gateway<Project>
        + Gateway<WorkLog>
        + Gateway<Team>
        + Gateway<Personnel>
        + WorkLogBulk
        + 'static
{
}

/// Run a gateway call, failing with [`GatewayFailure::Timeout`] once `limit` elapses.
pub(crate) async fn bounded<T, F>(
    limit: Duration,
    operation: Operation,
    entity: EntityKind,
    call: F,
) -> Result<T, PersistenceError>
where
    F: Future<Output = Result<T, PersistenceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(PersistenceError::new(
            operation,
            entity,
            GatewayFailure::Timeout(limit),
        )),
    }
}

/// Turn a repository's "row matched" flag into a result.
pub(crate) fn require_row(
    matched: bool,
    operation: Operation,
    entity: EntityKind,
) -> Result<(), PersistenceError> {
    if matched {
        Ok(())
    } else {
        Err(PersistenceError::new(
            operation,
            entity,
            GatewayFailure::RowMissing,
        ))
    }
}
