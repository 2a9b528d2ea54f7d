//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is how presentation layers learn that an entity collection
//! changed. It is designed to be shared via `Arc<EventBus>` between the
//! stores, which publish, and any number of subscribers.

use chrono::{DateTime, Utc};
use greenlog_core::types::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// StoreEvent
// ---------------------------------------------------------------------------

/// What happened to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The whole collection was replaced from the remote store.
    Loaded,
    Created,
    Updated,
    Removed,
    /// Work logs followed their project's archive flag.
    ArchiveCascaded,
    /// Work logs were deleted along with their project.
    DeleteCascaded,
}

/// A change applied to one of the entity stores.
///
/// Published only after the in-memory collection reflects the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    pub entity: EntityKind,
    pub change: ChangeKind,

    /// The entity changed, or the project driving a cascade.
    pub entity_id: Option<EntityId>,

    /// Number of entities touched (collection size for `Loaded`).
    pub affected: usize,

    /// When the change was applied (UTC).
    pub timestamp: DateTime<Utc>,
}

impl StoreEvent {
    /// Create an event touching a single, unnamed entity.
    pub fn new(entity: EntityKind, change: ChangeKind) -> Self {
        Self {
            entity,
            change,
            entity_id: None,
            affected: 1,
            timestamp: Utc::now(),
        }
    }

    /// Attach the id of the entity (or cascade source) involved.
    pub fn with_entity(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Set how many entities were touched.
    pub fn with_affected(mut self, affected: usize) -> Self {
        self.affected = affected;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`StoreEvent`].
///
/// # Usage
///
/// ```rust
/// use greenlog_core::types::EntityKind;
/// use greenlog_events::bus::{ChangeKind, EventBus, StoreEvent};
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
///
/// bus.publish(StoreEvent::new(EntityKind::Team, ChangeKind::Created));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: StoreEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let id = EntityId::new_v4();

        bus.publish(
            StoreEvent::new(EntityKind::WorkLog, ChangeKind::ArchiveCascaded)
                .with_entity(id)
                .with_affected(3),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.entity, EntityKind::WorkLog);
        assert_eq!(received.change, ChangeKind::ArchiveCascaded);
        assert_eq!(received.entity_id, Some(id));
        assert_eq!(received.affected, 3);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(StoreEvent::new(EntityKind::Team, ChangeKind::Removed));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.change, ChangeKind::Removed);
        assert_eq!(e2.change, ChangeKind::Removed);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(StoreEvent::new(EntityKind::Project, ChangeKind::Created));
    }

    #[test]
    fn default_event_touches_one_unnamed_entity() {
        let event = StoreEvent::new(EntityKind::Personnel, ChangeKind::Updated);
        assert!(event.entity_id.is_none());
        assert_eq!(event.affected, 1);
    }
}
