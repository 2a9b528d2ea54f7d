use std::time::Duration;

use greenlog_core::error::CoreError;
use greenlog_core::types::{EntityId, EntityKind};

/// Remote call attempted when a [`PersistenceError`] occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
    /// `project_id`-filtered archive flag update.
    BulkArchive,
    /// `project_id`-filtered delete.
    BulkDelete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::BulkArchive => "bulk archive",
            Self::BulkDelete => "bulk delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a gateway call failed.
#[derive(Debug, thiserror::Error)]
pub enum GatewayFailure {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("row translation failed: {0}")]
    Translation(CoreError),

    #[error("no matching remote row")]
    RowMissing,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("rejected by remote store: {0}")]
    Rejected(String),
}

/// A gateway-level failure tagged with the attempted operation and entity type.
#[derive(Debug, thiserror::Error)]
#[error("{operation} {entity} failed: {cause}")]
pub struct PersistenceError {
    pub operation: Operation,
    pub entity: EntityKind,
    #[source]
    pub cause: GatewayFailure,
}

impl PersistenceError {
    pub fn new(operation: Operation, entity: EntityKind, cause: impl Into<GatewayFailure>) -> Self {
        Self {
            operation,
            entity,
            cause: cause.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, GatewayFailure::Timeout(_))
    }
}

/// Error returned by every store and cascade operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Detected locally; nothing was sent to the remote store.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote store failed; the local collection is unchanged.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The project's archive flag was committed but its work logs did not follow.
    #[error("project {project_id} archive state changed but its work logs were not updated: {source}")]
    CascadeIncomplete {
        project_id: EntityId,
        source: PersistenceError,
    },
}

/// Convenience type alias for store operation results.
pub type StoreResult<T> = Result<T, StoreError>;
