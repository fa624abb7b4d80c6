// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS compatibility checking (RxO - Request vs Offered).
//!
//!
//! Implements DDS v1.4 Sec.2.2.3 QoS compatibility rules to determine if
//! a DataWriter can communicate with a DataReader based on their QoS policies.
//!
//! # Compatibility Rules
//!
//! | Policy          | Rule                                               |
//! |-----------------|-----------------------------------------------------|
//! | Reliability     | Writer >= Reader (Reliable > BestEffort)             |
//! | Durability      | Writer >= Reader (Persistent > Transient > TransientLocal > Volatile) |
//! | History         | Writer depth >= Reader depth                         |
//! | Deadline        | Writer period <= Reader period                       |
//! | LatencyBudget   | Writer duration <= Reader duration                   |
//! | Ownership       | Must match exactly                                  |
//! | Liveliness      | Kind must match, writer lease <= reader lease        |
//! | DestinationOrder| Writer kind >= Reader kind                           |
//! | Presentation    | Writer access_scope >= Reader access_scope, coherent/ordered offered >= requested |
//! | Partition       | Must have intersection (glob-aware)                  |
//!
//! `check_compatibility` returns the first violated policy, in the order
//! above, for listener reporting (`RequestedIncompatibleQosStatus::last_policy_id`).
//! `is_compatible` is a thin `bool` wrapper over it.

use crate::dds::qos::{Durability, History, LivelinessKind, PolicyId, QoS, Reliability};

/// Rank `LivelinessKind` for RxO ordering: `AUTOMATIC < MANUAL_BY_PARTICIPANT < MANUAL_BY_TOPIC`.
fn liveliness_rank(kind: LivelinessKind) -> u8 {
    match kind {
        LivelinessKind::Automatic => 0,
        LivelinessKind::ManualByParticipant => 1,
        LivelinessKind::ManualByTopic => 2,
    }
}

/// Full RxO compatibility check, returning the first violated policy id on failure.
///
/// `reader_qos` is the requested side, `writer_qos` the offered side. Topic
/// name / type name identity (spec rule 1) is enforced upstream by the
/// discovery index, which groups candidates by `(topic_name, type_id)`
/// before this check ever runs -- mismatched names never reach here.
pub(super) fn check_compatibility(reader_qos: &QoS, writer_qos: &QoS) -> Result<(), PolicyId> {
    crate::trace_fn!("qos::check_compatibility");

    // Reliability: BEST_EFFORT < RELIABLE.
    let reliability_ok = match (&writer_qos.reliability, &reader_qos.reliability) {
        (Reliability::BestEffort, Reliability::Reliable) => false,
        (Reliability::BestEffort, Reliability::BestEffort)
        | (Reliability::Reliable, Reliability::BestEffort)
        | (Reliability::Reliable, Reliability::Reliable) => true,
    };
    if !reliability_ok {
        log::debug!(
            "[MATCH-QOS] Reliability mismatch (writer={:?}, reader={:?})",
            writer_qos.reliability,
            reader_qos.reliability
        );
        return Err(PolicyId::Reliability);
    }

    // Durability: VOLATILE < TRANSIENT_LOCAL < TRANSIENT < PERSISTENT.
    let durability_rank = |durability: Durability| match durability {
        Durability::Volatile => 0u8,
        Durability::TransientLocal => 1u8,
        Durability::Transient => 2u8,
        Durability::Persistent => 3u8,
    };
    if durability_rank(writer_qos.durability) < durability_rank(reader_qos.durability) {
        log::debug!(
            "[MATCH-QOS] Durability mismatch (writer={:?}, reader={:?})",
            writer_qos.durability,
            reader_qos.durability
        );
        return Err(PolicyId::Durability);
    }

    // History (writer must retain at least as much as the reader asks for).
    let history_ok = match (reader_qos.history, writer_qos.history) {
        (History::KeepLast(r_keep), History::KeepLast(w_keep)) => w_keep >= r_keep,
        (History::KeepLast(_), History::KeepAll) => true,
        (History::KeepAll, History::KeepAll) => true,
        (History::KeepAll, History::KeepLast(_)) => false,
    };
    if !history_ok {
        log::debug!(
            "[MATCH-QOS] History mismatch (writer={:?}, reader={:?})",
            writer_qos.history,
            reader_qos.history
        );
        return Err(PolicyId::History);
    }

    // Deadline: writer.period <= reader.period.
    if !writer_qos.deadline.is_compatible_with(&reader_qos.deadline) {
        log::debug!(
            "[MATCH-QOS] Deadline mismatch (writer={:?}, reader={:?})",
            writer_qos.deadline,
            reader_qos.deadline
        );
        return Err(PolicyId::Deadline);
    }

    // LatencyBudget: writer.duration <= reader.duration.
    if !writer_qos
        .latency_budget
        .is_compatible_with(&reader_qos.latency_budget)
    {
        log::debug!(
            "[MATCH-QOS] LatencyBudget mismatch (writer={:?}, reader={:?})",
            writer_qos.latency_budget,
            reader_qos.latency_budget
        );
        return Err(PolicyId::LatencyBudget);
    }

    // Ownership: kind must match exactly.
    if !writer_qos.ownership.is_compatible_with(&reader_qos.ownership) {
        log::debug!(
            "[MATCH-QOS] Ownership mismatch (writer={:?}, reader={:?})",
            writer_qos.ownership,
            reader_qos.ownership
        );
        return Err(PolicyId::Ownership);
    }

    // Liveliness: kind ordered AUTOMATIC < MANUAL_BY_PARTICIPANT < MANUAL_BY_TOPIC,
    // reader requires writer's kind to be at least as strong, and
    // writer.lease_duration <= reader.lease_duration.
    if liveliness_rank(writer_qos.liveliness.kind) < liveliness_rank(reader_qos.liveliness.kind) {
        log::debug!(
            "[MATCH-QOS] Liveliness kind mismatch (writer={:?}, reader={:?})",
            writer_qos.liveliness.kind,
            reader_qos.liveliness.kind
        );
        return Err(PolicyId::Liveliness);
    }
    if writer_qos.liveliness.lease_duration > reader_qos.liveliness.lease_duration {
        log::debug!(
            "[MATCH-QOS] Liveliness lease mismatch (writer={:?}, reader={:?})",
            writer_qos.liveliness.lease_duration,
            reader_qos.liveliness.lease_duration
        );
        return Err(PolicyId::Liveliness);
    }

    // DestinationOrder: BY_RECEPTION_TIMESTAMP < BY_SOURCE_TIMESTAMP.
    if !writer_qos
        .destination_order
        .is_compatible_with(&reader_qos.destination_order)
    {
        log::debug!(
            "[MATCH-QOS] DestinationOrder mismatch (writer={:?}, reader={:?})",
            writer_qos.destination_order,
            reader_qos.destination_order
        );
        return Err(PolicyId::DestinationOrder);
    }

    // Presentation: access_scope ordered, coherent/ordered requested <= offered.
    if !writer_qos
        .presentation
        .is_compatible_with(&reader_qos.presentation)
    {
        log::debug!(
            "[MATCH-QOS] Presentation mismatch (writer={:?}, reader={:?})",
            writer_qos.presentation,
            reader_qos.presentation
        );
        return Err(PolicyId::Presentation);
    }

    // Partition: glob-aware intersection (or both default).
    if !writer_qos
        .partition
        .is_compatible_with(&reader_qos.partition)
    {
        log::debug!(
            "[MATCH-QOS] Partition mismatch (writer={:?}, reader={:?})",
            writer_qos.partition,
            reader_qos.partition
        );
        return Err(PolicyId::Partition);
    }

    // DataRepresentation: representation negotiation belongs to the external
    // wire codec (out of scope, spec.md SS1); no policy data to compare here.

    Ok(())
}

/// Check QoS compatibility between offered (writer) and requested (reader).
///
/// Convenience `bool` wrapper over [`check_compatibility`] for call sites
/// that don't need to report which policy failed.
pub(super) fn is_compatible(reader_qos: &QoS, writer_qos: &QoS) -> bool {
    crate::trace_fn!("qos::is_compatible");
    check_compatibility(reader_qos, writer_qos).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::qos::{
        Deadline, Durability, History, Liveliness, Ownership, Partition, QoS, Reliability,
    };

    #[test]
    fn test_reliability_best_effort_compatible() {
        let reader = QoS {
            reliability: Reliability::BestEffort,
            ..QoS::default()
        };
        let writer = QoS {
            reliability: Reliability::BestEffort,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_reliability_best_effort_writer_reliable_reader_incompatible() {
        let reader = QoS {
            reliability: Reliability::Reliable,
            ..QoS::default()
        };
        let writer = QoS {
            reliability: Reliability::BestEffort,
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_reliability_reliable_writer_best_effort_reader_compatible() {
        let reader = QoS {
            reliability: Reliability::BestEffort,
            ..QoS::default()
        };
        let writer = QoS {
            reliability: Reliability::Reliable,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_durability_volatile_compatible() {
        let reader = QoS {
            durability: Durability::Volatile,
            ..QoS::default()
        };
        let writer = QoS {
            durability: Durability::Volatile,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_durability_transient_writer_volatile_reader_compatible() {
        let reader = QoS {
            durability: Durability::Volatile,
            ..QoS::default()
        };
        let writer = QoS {
            durability: Durability::TransientLocal,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_durability_volatile_writer_transient_reader_incompatible() {
        let reader = QoS {
            durability: Durability::TransientLocal,
            ..QoS::default()
        };
        let writer = QoS {
            durability: Durability::Volatile,
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_durability_transient_writer_transient_local_reader_compatible() {
        let reader = QoS {
            durability: Durability::TransientLocal,
            ..QoS::default()
        };
        let writer = QoS {
            durability: Durability::Transient,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_durability_transient_local_writer_transient_reader_incompatible() {
        let reader = QoS {
            durability: Durability::Transient,
            ..QoS::default()
        };
        let writer = QoS {
            durability: Durability::TransientLocal,
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_durability_persistent_writer_transient_reader_compatible() {
        let reader = QoS {
            durability: Durability::Transient,
            ..QoS::default()
        };
        let writer = QoS {
            durability: Durability::Persistent,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_history_writer_greater_compatible() {
        let reader = QoS {
            history: History::KeepLast(5),
            ..QoS::default()
        };
        let writer = QoS {
            history: History::KeepLast(10),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_history_writer_less_incompatible() {
        let reader = QoS {
            history: History::KeepLast(10),
            ..QoS::default()
        };
        let writer = QoS {
            history: History::KeepLast(5),
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_history_keep_all_writer_compatible() {
        let reader = QoS {
            history: History::KeepLast(10),
            ..QoS::default()
        };
        let writer = QoS {
            history: History::KeepAll,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_history_keep_all_reader_requires_keep_all() {
        let reader = QoS {
            history: History::KeepAll,
            ..QoS::default()
        };
        let writer = QoS {
            history: History::KeepLast(10),
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_history_keep_all_both_compatible() {
        let reader = QoS {
            history: History::KeepAll,
            ..QoS::default()
        };
        let writer = QoS {
            history: History::KeepAll,
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_deadline_compatible() {
        let reader = QoS {
            deadline: Deadline::from_millis(200),
            ..QoS::default()
        };
        let writer = QoS {
            deadline: Deadline::from_millis(100),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer)); // Writer faster
    }

    #[test]
    fn test_deadline_incompatible() {
        let reader = QoS {
            deadline: Deadline::from_millis(100),
            ..QoS::default()
        };
        let writer = QoS {
            deadline: Deadline::from_millis(200),
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer)); // Writer too slow
    }

    #[test]
    fn test_ownership_shared_compatible() {
        let reader = QoS {
            ownership: Ownership::shared(),
            ..QoS::default()
        };
        let writer = QoS {
            ownership: Ownership::shared(),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_ownership_exclusive_compatible() {
        let reader = QoS {
            ownership: Ownership::exclusive(),
            ..QoS::default()
        };
        let writer = QoS {
            ownership: Ownership::exclusive(),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_ownership_mismatch_incompatible() {
        let reader = QoS {
            ownership: Ownership::shared(),
            ..QoS::default()
        };
        let writer = QoS {
            ownership: Ownership::exclusive(),
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_liveliness_compatible() {
        let reader = QoS {
            liveliness: Liveliness::automatic_secs(10),
            ..QoS::default()
        };
        let writer = QoS {
            liveliness: Liveliness::automatic_secs(5),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer)); // Writer lease <= reader lease
    }

    #[test]
    fn test_liveliness_lease_incompatible() {
        let reader = QoS {
            liveliness: Liveliness::automatic_secs(5),
            ..QoS::default()
        };
        let writer = QoS {
            liveliness: Liveliness::automatic_secs(10),
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer)); // Writer lease > reader lease
    }

    #[test]
    fn test_partition_both_default_compatible() {
        let reader = QoS {
            partition: Partition::default(),
            ..QoS::default()
        };
        let writer = QoS {
            partition: Partition::default(),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_partition_same_compatible() {
        let reader = QoS {
            partition: Partition::single("sensor"),
            ..QoS::default()
        };
        let writer = QoS {
            partition: Partition::single("sensor"),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_partition_different_incompatible() {
        let reader = QoS {
            partition: Partition::single("sensor"),
            ..QoS::default()
        };
        let writer = QoS {
            partition: Partition::single("actuator"),
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }

    #[test]
    fn test_partition_intersection_compatible() {
        let reader = QoS {
            partition: Partition::new(vec!["sensor".to_string(), "actuator".to_string()]),
            ..QoS::default()
        };
        let writer = QoS {
            partition: Partition::single("actuator"),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_all_policies_compatible() {
        let reader = QoS {
            reliability: Reliability::BestEffort,
            durability: Durability::Volatile,
            history: History::KeepLast(10),
            deadline: Deadline::from_millis(200),
            ownership: Ownership::shared(),
            liveliness: Liveliness::automatic_secs(10),
            partition: Partition::single("sensor"),
            ..QoS::default()
        };
        let writer = QoS {
            reliability: Reliability::BestEffort,
            durability: Durability::Volatile,
            history: History::KeepLast(100),
            deadline: Deadline::from_millis(100),
            ownership: Ownership::shared(),
            liveliness: Liveliness::automatic_secs(5),
            partition: Partition::single("sensor"),
            ..QoS::default()
        };
        assert!(is_compatible(&reader, &writer));
    }

    #[test]
    fn test_multiple_policies_incompatible() {
        let reader = QoS {
            reliability: Reliability::Reliable,
            ownership: Ownership::exclusive(),
            ..QoS::default()
        };
        let writer = QoS {
            reliability: Reliability::BestEffort, // Incompatible
            ownership: Ownership::shared(),       // Incompatible
            ..QoS::default()
        };
        assert!(!is_compatible(&reader, &writer));
    }
}
