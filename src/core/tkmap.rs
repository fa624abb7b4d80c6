// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance map (`tkmap`): interns `(topic, key-hash)` pairs to a stable
//! `InstanceId`, shared by every WHC/RHC that needs keyed-instance identity.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable numeric handle minted per distinct `(topic, key-hash)` pair.
///
/// Lives as long as any reader or writer references it; the map entry is
/// refcounted so the last dropper can reclaim the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct InstanceKey {
    topic_id: u64,
    key_hash: u128,
}

struct Slot {
    id: InstanceId,
    refcount: u64,
}

/// Interns `(topic_id, key_hash)` to a stable [`InstanceId`].
///
/// Concurrency: backed by `dashmap` for lock-free reads on the common path;
/// ids are minted from a single atomic counter so they stay globally unique
/// even as entries are reclaimed and reused under different keys.
pub struct TkMap {
    by_key: DashMap<InstanceKey, Slot>,
    next_id: AtomicU64,
}

impl TkMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_key: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Intern `(topic_id, key_hash)`, incrementing its reference count.
    ///
    /// Returns the existing id if the pair was seen before, otherwise mints
    /// a fresh one.
    pub fn acquire(&self, topic_id: u64, key_hash: u128) -> InstanceId {
        let key = InstanceKey { topic_id, key_hash };
        let mut entry = self.by_key.entry(key).or_insert_with(|| Slot {
            id: InstanceId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            refcount: 0,
        });
        entry.refcount += 1;
        entry.id
    }

    /// Look up an already-interned id without affecting its refcount.
    #[must_use]
    pub fn lookup(&self, topic_id: u64, key_hash: u128) -> Option<InstanceId> {
        self.by_key
            .get(&InstanceKey { topic_id, key_hash })
            .map(|e| e.id)
    }

    /// Release one reference; reclaims the slot when the count hits zero.
    pub fn release(&self, topic_id: u64, key_hash: u128) {
        let key = InstanceKey { topic_id, key_hash };
        let should_remove = match self.by_key.get_mut(&key) {
            Some(mut entry) => {
                entry.refcount = entry.refcount.saturating_sub(1);
                entry.refcount == 0
            }
            None => false,
        };
        if should_remove {
            self.by_key.remove(&key);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl Default for TkMap {
    fn default() -> Self {
        Self::new()
    }
}
