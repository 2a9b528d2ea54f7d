//! Entity synchronization and cascade consistency for Greenlog.
//!
//! - [`gateway`]: remote CRUD transport ([`PgGateway`], [`MemoryGateway`]).
//! - [`store::EntityStore`]: per-type in-memory source of truth.
//! - [`cascade::CascadeCoordinator`]: archive/delete propagation and the team guard.
//! - [`Stores`]: everything above wired to one backend and one [`EventBus`](greenlog_events::EventBus).
//!
//! Read-side aggregates live in [`greenlog_core::query`] and take a
//! collection snapshot such as `stores.work_logs.get_all()`.

pub mod cascade;
pub mod config;
pub mod error;
pub mod gateway;
pub mod store;
pub mod stores;

pub use cascade::{CascadeCoordinator, CascadeReport};
pub use config::{ConfigError, StoreConfig};
pub use error::{GatewayFailure, Operation, PersistenceError, StoreError, StoreResult};
pub use gateway::{Fault, Gateway, MemoryGateway, PgGateway, RemoteStore, WorkLogBulk};
pub use store::{ArchiveParent, Change, EntityStore};
pub use stores::Stores;
