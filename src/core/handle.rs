// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity/handle registry: pinned handles, parent/child lifetime, status
//! mask and listener dispatch.
//!
//! Every DDS entity (participant, topic, publisher, subscriber, writer,
//! reader, waitset, condition) gets a stable integer handle from this
//! registry. Cyclic references between entities (parent/child, waitset to
//! observed entity) are never owning pointers: everything is a handle
//! looked up here, so the registry is the single source of truth for
//! lifetime (spec.md §9).
//!
//! Deletion is two-phase: [`HandleRegistry::close`] marks an entity
//! not-pinnable and wakes anyone waiting on its pin count; `delete` (driven
//! by the owner once the pin count reaches zero) removes it and recurses
//! into children depth-first.

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Stable integer handle identifying an entity for the lifetime of the
/// process (handles are never reused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A pin taken on a live entity. Dropping it releases the pin.
pub struct Pinned<'a> {
    registry: &'a HandleRegistry,
    handle: Handle,
}

impl Drop for Pinned<'_> {
    fn drop(&mut self) {
        self.registry.unpin(self.handle);
    }
}

/// 32-bit "status changed" bitmask plus an "enabled" bitmask; a status bit
/// only triggers a waitset when both bits are set (spec.md §3).
#[derive(Debug, Default)]
pub struct StatusMask {
    changed: AtomicU32,
    enabled: AtomicU32,
}

impl StatusMask {
    #[must_use]
    pub fn new(enabled: u32) -> Self {
        Self {
            changed: AtomicU32::new(0),
            enabled: AtomicU32::new(enabled),
        }
    }

    pub fn set_enabled(&self, mask: u32) {
        self.enabled.store(mask, Ordering::SeqCst);
    }

    /// Raise `bits` in the changed mask. Returns the bits that actually
    /// trigger (changed AND enabled).
    pub fn raise(&self, bits: u32) -> u32 {
        self.changed.fetch_or(bits, Ordering::SeqCst);
        bits & self.enabled.load(Ordering::SeqCst)
    }

    /// Clear `bits` from the changed mask (reset-on-invoke).
    pub fn clear(&self, bits: u32) {
        self.changed.fetch_and(!bits, Ordering::SeqCst);
    }

    #[must_use]
    pub fn changed_bits(&self) -> u32 {
        self.changed.load(Ordering::SeqCst)
    }
}

enum EntityPhase {
    Live,
    /// Marked not-pinnable; waiting for outstanding pins to drain.
    Closing,
    Deleted,
}

struct EntityRecord {
    parent: Option<Handle>,
    children: Mutex<Vec<Handle>>,
    pin_count: AtomicI64,
    phase: Mutex<EntityPhase>,
    drain_cv: Condvar,
    status: StatusMask,
}

/// Registry of every live entity in a domain, keyed by [`Handle`].
///
/// Locking discipline (spec.md §5): this registry's mutex is the
/// "per-entity mutex" tier; callers must not hold a lower-numbered lock
/// (global, per-domain) while calling into it if that would invert the
/// documented order, and listener callbacks are always invoked with no
/// registry lock held.
pub struct HandleRegistry {
    next_handle: AtomicU64,
    entities: Mutex<HashMap<Handle, Arc<EntityRecord>>>,
}

impl HandleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            entities: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new entity under `parent` (`None` for the root "process"
    /// entity), returning its handle.
    pub fn create(&self, parent: Option<Handle>, enabled_status_mask: u32) -> Handle {
        let handle = Handle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let record = Arc::new(EntityRecord {
            parent,
            children: Mutex::new(Vec::new()),
            pin_count: AtomicI64::new(0),
            phase: Mutex::new(EntityPhase::Live),
            drain_cv: Condvar::new(),
            status: StatusMask::new(enabled_status_mask),
        });
        let mut entities = self.entities.lock();
        if let Some(p) = parent {
            if let Some(parent_rec) = entities.get(&p) {
                parent_rec.children.lock().push(handle);
            }
        }
        entities.insert(handle, record);
        log::debug!("handle registry: created {:?} under parent {:?}", handle, parent);
        handle
    }

    /// Atomically take a reference to a live entity, failing if it is
    /// closing or already deleted.
    pub fn pin(&self, handle: Handle) -> Option<Pinned<'_>> {
        let entities = self.entities.lock();
        let record = entities.get(&handle)?.clone();
        drop(entities);

        let phase = record.phase.lock();
        match *phase {
            EntityPhase::Live => {
                record.pin_count.fetch_add(1, Ordering::SeqCst);
                Some(Pinned {
                    registry: self,
                    handle,
                })
            }
            EntityPhase::Closing | EntityPhase::Deleted => None,
        }
    }

    fn unpin(&self, handle: Handle) {
        let entities = self.entities.lock();
        if let Some(record) = entities.get(&handle).cloned() {
            drop(entities);
            if record.pin_count.fetch_sub(1, Ordering::SeqCst) == 1 {
                let phase = record.phase.lock();
                if matches!(*phase, EntityPhase::Closing) {
                    record.drain_cv.notify_all();
                }
            }
        }
    }

    /// Phase 1 of deletion: mark not-pinnable and wake anyone draining.
    ///
    /// Returns `false` if the handle is unknown or already closing/deleted.
    pub fn close(&self, handle: Handle) -> bool {
        let entities = self.entities.lock();
        let Some(record) = entities.get(&handle).cloned() else {
            return false;
        };
        drop(entities);

        let mut phase = record.phase.lock();
        if !matches!(*phase, EntityPhase::Live) {
            return false;
        }
        *phase = EntityPhase::Closing;
        record.drain_cv.notify_all();
        true
    }

    /// Phase 2: block until the pin count reaches zero, then remove the
    /// entity and recurse depth-first into children. Must be called after
    /// [`Self::close`].
    pub fn delete(&self, handle: Handle) {
        let record = {
            let entities = self.entities.lock();
            match entities.get(&handle) {
                Some(r) => r.clone(),
                None => return,
            }
        };

        {
            let mut phase = record.phase.lock();
            while record.pin_count.load(Ordering::SeqCst) > 0 {
                record.drain_cv.wait(&mut phase);
            }
        }

        let children = record.children.lock().clone();
        for child in children {
            self.close(child);
            self.delete(child);
        }

        let mut phase = record.phase.lock();
        *phase = EntityPhase::Deleted;
        drop(phase);
        self.entities.lock().remove(&handle);
        log::debug!("handle registry: deleted {:?}", handle);
    }

    /// Raise a status bit and return whether it should trigger a waitset
    /// wake (both "changed" and "enabled").
    pub fn raise_status(&self, handle: Handle, bits: u32) -> u32 {
        let entities = self.entities.lock();
        match entities.get(&handle) {
            Some(record) => record.status.raise(bits),
            None => 0,
        }
    }

    pub fn clear_status(&self, handle: Handle, bits: u32) {
        let entities = self.entities.lock();
        if let Some(record) = entities.get(&handle) {
            record.status.clear(bits);
        }
    }

    #[must_use]
    pub fn status_bits(&self, handle: Handle) -> u32 {
        let entities = self.entities.lock();
        entities
            .get(&handle)
            .map_or(0, |r| r.status.changed_bits())
    }

    #[must_use]
    pub fn parent_of(&self, handle: Handle) -> Option<Handle> {
        self.entities.lock().get(&handle).and_then(|r| r.parent)
    }

    #[must_use]
    pub fn children_of(&self, handle: Handle) -> Vec<Handle> {
        self.entities
            .lock()
            .get(&handle)
            .map(|r| r.children.lock().clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.lock().is_empty()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_succeeds_while_live() {
        let reg = HandleRegistry::new();
        let h = reg.create(None, 0xFFFF_FFFF);
        let pinned = reg.pin(h);
        assert!(pinned.is_some());
    }

    #[test]
    fn pin_fails_after_close() {
        let reg = HandleRegistry::new();
        let h = reg.create(None, 0);
        assert!(reg.close(h));
        assert!(reg.pin(h).is_none());
    }

    #[test]
    fn delete_waits_for_outstanding_pin_to_drop() {
        let reg = Arc::new(HandleRegistry::new());
        let h = reg.create(None, 0);
        let pinned = reg.pin(h).unwrap();
        assert!(reg.close(h));

        let reg2 = reg.clone();
        let handle_copy = h;
        let worker = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            drop(pinned);
            let _ = handle_copy;
        });
        reg.delete(h);
        worker.join().unwrap();
        assert!(reg.pin(h).is_none());
        assert_eq!(reg2.len(), 0);
    }

    #[test]
    fn children_deleted_before_parent() {
        let reg = HandleRegistry::new();
        let parent = reg.create(None, 0);
        let child = reg.create(Some(parent), 0);
        assert_eq!(reg.children_of(parent), vec![child]);
        assert!(reg.close(parent));
        reg.delete(parent);
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn status_raise_requires_enabled_bit() {
        let reg = HandleRegistry::new();
        let h = reg.create(None, 0b0001);
        assert_eq!(reg.raise_status(h, 0b0010), 0, "bit not enabled, no trigger");
        assert_eq!(reg.raise_status(h, 0b0001), 0b0001, "enabled bit triggers");
        assert_eq!(reg.status_bits(h), 0b0011, "both bits recorded as changed");
        reg.clear_status(h, 0b0001);
        assert_eq!(reg.status_bits(h), 0b0010);
    }
}
