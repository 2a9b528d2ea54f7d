//! Greenlog change notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StoreEvent`]: envelope describing one applied collection change.

pub mod bus;

pub use bus::{ChangeKind, EventBus, StoreEvent};
