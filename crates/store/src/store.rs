//! Per-type in-memory collection kept in line with the remote store.
//!
//! [`EntityStore`] is the single in-process source of truth for one entity
//! type. A mutation reaches the local collection only after the gateway has
//! confirmed it; on failure the collection is left untouched and the error
//! is returned. Subscribers are notified once the change is fully applied.
//!
//! Entities linked to a project (see [`Entity::archive_link`]) inherit the
//! project's archive flag when created or updated, provided the store was
//! given an [`ArchiveParent`].
//!
//! Concurrent updates to the same entity are last-write-wins: there is no
//! version check between the snapshot an update starts from and the remote
//! row it overwrites.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use greenlog_core::error::CoreError;
use greenlog_core::models::{Entity, Personnel, Project, WorkLog};
use greenlog_core::types::EntityId;
use greenlog_events::{ChangeKind, EventBus, StoreEvent};

use crate::error::{Operation, PersistenceError, StoreResult};
use crate::gateway::{bounded, Gateway};

/// How `update` should change an entity.
#[derive(Debug)]
pub enum Change<E: Entity> {
    /// Replace the whole entity; its id must match the target id.
    Replace(E),
    /// Merge a partial update onto the current entity.
    Patch(E::Patch),
}

/// Source of the archive flag a linked entity inherits.
pub trait ArchiveParent: Send + Sync {
    /// Archive flag of the parent with `id`, or `None` if it is not known locally.
    fn parent_archived(&self, id: EntityId) -> Option<bool>;
}

/// In-memory collection of one entity type.
pub struct EntityStore<E: Entity> {
    items: RwLock<Vec<E>>,
    gateway: Arc<dyn Gateway<E>>,
    bus: Arc<EventBus>,
    timeout: Duration,
    archive_parent: Option<Arc<dyn ArchiveParent>>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new(gateway: Arc<dyn Gateway<E>>, bus: Arc<EventBus>, timeout: Duration) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            gateway,
            bus,
            timeout,
            archive_parent: None,
        }
    }

    /// Make linked entities take their archive flag from `parent`.
    pub fn with_archive_parent(mut self, parent: Arc<dyn ArchiveParent>) -> Self {
        self.archive_parent = Some(parent);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<E>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<E>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Reads ─────────────────────────────────────────────────────────

    /// Snapshot of the collection in its current order.
    pub fn get_all(&self) -> Vec<E> {
        self.read().clone()
    }

    pub fn get_by_id(&self, id: EntityId) -> Option<E> {
        self.read().iter().find(|e| e.id() == id).cloned()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.read().iter().any(|e| e.id() == id)
    }

    /// Count entities matching `predicate` without cloning the collection.
    pub fn count_where(&self, predicate: impl Fn(&E) -> bool) -> usize {
        self.read().iter().filter(|e| predicate(e)).count()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // ── Mutations ─────────────────────────────────────────────────────

    /// Replace the collection with what the remote store currently holds.
    pub async fn reload(&self) -> StoreResult<usize> {
        let items = self.call(Operation::Load, self.gateway.load()).await?;
        let count = items.len();
        *self.write() = items;
        tracing::debug!(entity = %E::KIND, count, "Collection loaded");
        self.publish(StoreEvent::new(E::KIND, ChangeKind::Loaded).with_affected(count));
        Ok(count)
    }

    /// Validate, create remotely, then insert the confirmed entity.
    pub async fn add(&self, mut input: E::Create) -> StoreResult<E> {
        E::validate_create(&input)?;
        if let Some((parent, archived)) = E::create_archive_link(&mut input) {
            self.inherit_archive(parent, archived);
        }
        let created = self
            .call(Operation::Create, self.gateway.create(&input))
            .await?;
        self.write().push(created.clone());
        tracing::info!(entity = %E::KIND, id = %created.id(), "Entity created");
        self.publish(StoreEvent::new(E::KIND, ChangeKind::Created).with_entity(created.id()));
        Ok(created)
    }

    /// Replace or patch the entity with `id`, returning the stored result.
    pub async fn update(&self, id: EntityId, change: Change<E>) -> StoreResult<E> {
        let current = self.get_by_id(id).ok_or_else(|| E::not_found(id))?;
        let mut next = match change {
            Change::Replace(next) => {
                if next.id() != id {
                    return Err(CoreError::Validation(format!(
                        "replacement {} has id {} but {id} was targeted",
                        E::KIND,
                        next.id()
                    ))
                    .into());
                }
                next
            }
            Change::Patch(patch) => {
                let mut next = current.clone();
                next.apply_patch(patch);
                next
            }
        };
        current.check_transition(&next)?;
        if let Some((parent, archived)) = next.archive_link() {
            self.inherit_archive(parent, archived);
        }
        self.commit_update(next).await
    }

    /// Validate and persist an already merged entity. Skips transition rules,
    /// which only the cascade coordinator may do.
    pub(crate) async fn commit_update(&self, next: E) -> StoreResult<E> {
        next.validate()?;
        let id = next.id();
        self.call(Operation::Update, self.gateway.update(&next))
            .await?;

        let replaced = {
            let mut items = self.write();
            match items.iter_mut().find(|e| e.id() == id) {
                Some(slot) => {
                    *slot = next.clone();
                    true
                }
                None => false,
            }
        };
        if !replaced {
            tracing::warn!(entity = %E::KIND, %id, "Updated entity vanished locally during update");
        }
        tracing::debug!(entity = %E::KIND, %id, "Entity updated");
        self.publish(StoreEvent::new(E::KIND, ChangeKind::Updated).with_entity(id));
        Ok(next)
    }

    /// Delete remotely, then drop the entity locally.
    pub(crate) async fn remove_confirmed(&self, id: EntityId) -> StoreResult<()> {
        if !self.contains(id) {
            return Err(E::not_found(id).into());
        }
        self.call(Operation::Delete, self.gateway.delete(id)).await?;
        self.write().retain(|e| e.id() != id);
        tracing::info!(entity = %E::KIND, %id, "Entity removed");
        self.publish(StoreEvent::new(E::KIND, ChangeKind::Removed).with_entity(id));
        Ok(())
    }

    // ── Local-only bulk edits (remote side already confirmed) ─────────

    /// Apply `edit` to every entity matching `predicate`. Returns how many matched.
    pub(crate) fn patch_local(
        &self,
        predicate: impl Fn(&E) -> bool,
        mut edit: impl FnMut(&mut E),
    ) -> usize {
        let mut items = self.write();
        let mut touched = 0;
        for item in items.iter_mut().filter(|e| predicate(e)) {
            edit(item);
            touched += 1;
        }
        touched
    }

    /// Drop every entity matching `predicate`. Returns how many were removed.
    pub(crate) fn remove_local(&self, predicate: impl Fn(&E) -> bool) -> usize {
        let mut items = self.write();
        let before = items.len();
        items.retain(|e| !predicate(e));
        before - items.len()
    }

    fn inherit_archive(&self, parent: EntityId, archived: &mut bool) {
        let inherited = self
            .archive_parent
            .as_ref()
            .and_then(|p| p.parent_archived(parent));
        if let Some(flag) = inherited {
            if *archived != flag {
                tracing::debug!(
                    entity = %E::KIND,
                    %parent,
                    archived = flag,
                    "Archive flag inherited from parent"
                );
            }
            *archived = flag;
        }
    }

    pub(crate) fn publish(&self, event: StoreEvent) {
        self.bus.publish(event);
    }

    /// Run a bounded gateway call, logging failures before handing them back.
    async fn call<T, F>(&self, operation: Operation, call: F) -> Result<T, PersistenceError>
    where
        F: Future<Output = Result<T, PersistenceError>>,
    {
        bounded(self.timeout, operation, E::KIND, call)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Gateway call failed"))
    }
}

impl ArchiveParent for EntityStore<Project> {
    fn parent_archived(&self, id: EntityId) -> Option<bool> {
        self.read().iter().find(|p| p.id == id).map(|p| p.is_archived)
    }
}

// Projects and teams are removed only through the cascade coordinator.

impl EntityStore<WorkLog> {
    pub async fn remove(&self, id: EntityId) -> StoreResult<()> {
        self.remove_confirmed(id).await
    }
}

impl EntityStore<Personnel> {
    pub async fn remove(&self, id: EntityId) -> StoreResult<()> {
        self.remove_confirmed(id).await
    }
}
