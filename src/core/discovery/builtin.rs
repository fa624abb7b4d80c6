// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in discovery topics (DCPSParticipant/DCPSTopic/DCPSPublication/DCPSSubscription).
//!
//! These are not wire-delivered samples: the data lives in the live entity
//! index (participants, topics, matched endpoints). `BuiltinWhc` projects
//! that index through the same read shape applications use for user
//! topics (`get_all_samples` / `len` / a monotonic sequence counter), so a
//! `DataReader<ParticipantBuiltinTopicData>` can be served by the same
//! take/read machinery as any other reader. `insert`/`remove_acknowledged`
//! are accepted but are no-ops: there is nothing to retransmit, since the
//! "samples" are regenerated on every read from current state.

use crate::reliability::HistoryCacheContract;
use crate::Error;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Well-known topic name for participant discovery (DDS spec 1.4 Sec.2.2.5).
pub const DCPS_PARTICIPANT: &str = "DCPSParticipant";
/// Well-known topic name for topic discovery.
pub const DCPS_TOPIC: &str = "DCPSTopic";
/// Well-known topic name for publication (writer) discovery.
pub const DCPS_PUBLICATION: &str = "DCPSPublication";
/// Well-known topic name for subscription (reader) discovery.
pub const DCPS_SUBSCRIPTION: &str = "DCPSSubscription";

/// Which built-in topic a [`BuiltinWhc`] instance is backing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTopicKind {
    Participant,
    Topic,
    Publication,
    Subscription,
}

impl BuiltinTopicKind {
    /// The well-known topic name for this kind.
    #[must_use]
    pub fn topic_name(self) -> &'static str {
        match self {
            BuiltinTopicKind::Participant => DCPS_PARTICIPANT,
            BuiltinTopicKind::Topic => DCPS_TOPIC,
            BuiltinTopicKind::Publication => DCPS_PUBLICATION,
            BuiltinTopicKind::Subscription => DCPS_SUBSCRIPTION,
        }
    }
}

/// A single row of a built-in discovery topic.
///
/// Mirrors the handful of fields every `*BuiltinTopicData` struct in the
/// DDS spec carries in common; entity-specific detail (QoS, partition,
/// type name) is flattened into `qos_summary` rather than modeled as a
/// dozen near-duplicate structs, since the external codec is what actually
/// serializes these onto the wire.
#[derive(Debug, Clone)]
pub struct BuiltinSample {
    /// BuiltinTopicKey_t of the entity this row describes.
    pub key: [u8; 16],
    /// BuiltinTopicKey_t of the owning participant (equal to `key` for
    /// `DCPSParticipant` rows).
    pub participant_key: [u8; 16],
    /// User topic name (empty for `DCPSParticipant` rows).
    pub topic_name: String,
    /// User type name (empty for `DCPSParticipant` rows).
    pub type_name: String,
    /// Human-readable summary of the entity's QoS, for diagnostics.
    pub qos_summary: String,
    /// False once the entity has been disposed/unregistered; readers see
    /// these rows long enough to process the matching `InstanceState`
    /// transition before they are pruned.
    pub alive: bool,
}

/// Read-only WHC-shaped view over the live entity index for one built-in
/// discovery topic.
///
/// `insert`/`remove_acknowledged` exist so `BuiltinWhc` can sit behind the
/// same reader-side call sites as [`crate::reliability::history_cache::HistoryCache`],
/// but they do not buffer payloads: `publish`/`dispose`/`unregister` are the
/// real write path, called by the discovery state machine whenever an
/// entity is created, updated, or torn down.
pub struct BuiltinWhc {
    kind: BuiltinTopicKind,
    rows: Mutex<HashMap<[u8; 16], BuiltinSample>>,
    /// Monotonically increasing generation counter, bumped on every
    /// publish/dispose/unregister. Stands in for `max_seq` in the WHC
    /// contract: there is no retransmission to drive off it, only
    /// change notification for waitset/listener wake-up.
    generation: AtomicU64,
}

impl BuiltinWhc {
    /// Create an empty built-in WHC for the given topic kind.
    #[must_use]
    pub fn new(kind: BuiltinTopicKind) -> Self {
        Self {
            kind,
            rows: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Which built-in topic this instance backs.
    #[must_use]
    pub fn kind(&self) -> BuiltinTopicKind {
        self.kind
    }

    /// Well-known topic name for this instance.
    #[must_use]
    pub fn topic_name(&self) -> &'static str {
        self.kind.topic_name()
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, HashMap<[u8; 16], BuiltinSample>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(e) => {
                log::debug!("[BuiltinWhc::{:?}] Lock poisoned, recovering", self.kind);
                e.into_inner()
            }
        }
    }

    /// Publish (create or update) a row for `key`. Called by discovery
    /// whenever a participant/topic/writer/reader is announced or its
    /// matched QoS-visible state changes.
    pub fn publish(&self, sample: BuiltinSample) {
        let key = sample.key;
        let mut rows = self.lock_rows();
        rows.insert(key, sample);
        drop(rows);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark a row not-alive (DDS `dispose`) without removing it yet, so a
    /// reader can still observe the `NOT_ALIVE_DISPOSED` transition.
    pub fn dispose(&self, key: [u8; 16]) {
        let mut rows = self.lock_rows();
        if let Some(row) = rows.get_mut(&key) {
            row.alive = false;
        }
        drop(rows);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove a row entirely (DDS `unregister`, lease expiry prune).
    pub fn unregister(&self, key: [u8; 16]) {
        let mut rows = self.lock_rows();
        rows.remove(&key);
        drop(rows);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Current row count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_rows().len()
    }

    /// True when no entities are currently indexed under this topic.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every currently indexed row, alive or disposed.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BuiltinSample> {
        self.lock_rows().values().cloned().collect()
    }

    /// Look up a single row by entity key.
    #[must_use]
    pub fn get(&self, key: &[u8; 16]) -> Option<BuiltinSample> {
        self.lock_rows().get(key).cloned()
    }

    /// Monotonic generation counter, standing in for the WHC's `max_seq`:
    /// bumped on every create/update/delete so a waitset can detect change
    /// without diffing the whole snapshot.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

impl HistoryCacheContract for BuiltinWhc {
    /// No-op: built-in rows are synthesized by `publish`, not appended by
    /// the reliability state machine. Always succeeds.
    fn insert(&self, _seq: u64, _payload: &[u8]) -> Result<(), Error> {
        Ok(())
    }

    /// No-op: there is nothing to retransmit, so nothing is ever removed.
    fn remove_acknowledged(&self, _acked_seq: u64) -> usize {
        0
    }

    fn len(&self) -> usize {
        BuiltinWhc::len(self)
    }

    fn is_empty(&self) -> bool {
        BuiltinWhc::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> [u8; 16] {
        [b; 16]
    }

    #[test]
    fn publish_then_snapshot_contains_row() {
        let whc = BuiltinWhc::new(BuiltinTopicKind::Publication);
        whc.publish(BuiltinSample {
            key: key(1),
            participant_key: key(0),
            topic_name: "sensor/temp".into(),
            type_name: "Temperature".into(),
            qos_summary: "RELIABLE, KEEP_LAST(10)".into(),
            alive: true,
        });

        assert_eq!(whc.len(), 1);
        let rows = whc.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].topic_name, "sensor/temp");
    }

    #[test]
    fn dispose_keeps_row_but_marks_not_alive() {
        let whc = BuiltinWhc::new(BuiltinTopicKind::Subscription);
        whc.publish(BuiltinSample {
            key: key(2),
            participant_key: key(0),
            topic_name: "sensor/temp".into(),
            type_name: "Temperature".into(),
            qos_summary: String::new(),
            alive: true,
        });

        whc.dispose(key(2));

        assert_eq!(whc.len(), 1);
        assert!(!whc.get(&key(2)).unwrap().alive);
    }

    #[test]
    fn unregister_removes_row() {
        let whc = BuiltinWhc::new(BuiltinTopicKind::Topic);
        whc.publish(BuiltinSample {
            key: key(3),
            participant_key: key(0),
            topic_name: "sensor/temp".into(),
            type_name: "Temperature".into(),
            qos_summary: String::new(),
            alive: true,
        });

        whc.unregister(key(3));

        assert!(whc.is_empty());
        assert!(whc.get(&key(3)).is_none());
    }

    #[test]
    fn generation_advances_on_every_mutation() {
        let whc = BuiltinWhc::new(BuiltinTopicKind::Participant);
        let g0 = whc.generation();

        whc.publish(BuiltinSample {
            key: key(4),
            participant_key: key(4),
            topic_name: String::new(),
            type_name: String::new(),
            qos_summary: String::new(),
            alive: true,
        });
        let g1 = whc.generation();
        assert!(g1 > g0);

        whc.dispose(key(4));
        let g2 = whc.generation();
        assert!(g2 > g1);

        whc.unregister(key(4));
        let g3 = whc.generation();
        assert!(g3 > g2);
    }

    #[test]
    fn history_cache_contract_insert_and_remove_acknowledged_are_inert() {
        let whc = BuiltinWhc::new(BuiltinTopicKind::Topic);
        let contract: &dyn HistoryCacheContract = &whc;

        assert!(contract.insert(1, b"ignored").is_ok());
        assert_eq!(contract.remove_acknowledged(u64::MAX), 0);
        assert_eq!(contract.len(), 0);
        assert!(contract.is_empty());
    }

    #[test]
    fn topic_names_match_well_known_strings() {
        assert_eq!(BuiltinTopicKind::Participant.topic_name(), "DCPSParticipant");
        assert_eq!(BuiltinTopicKind::Topic.topic_name(), "DCPSTopic");
        assert_eq!(BuiltinTopicKind::Publication.topic_name(), "DCPSPublication");
        assert_eq!(
            BuiltinTopicKind::Subscription.topic_name(),
            "DCPSSubscription"
        );
    }
}
