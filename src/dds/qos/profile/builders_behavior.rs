// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS builder methods for behavior policies (liveliness, ownership, partition).

use super::super::{
    GroupData, Liveliness, Ownership, OwnershipStrength, Partition, TopicData, UserData,
};
use super::structs::QoS;

impl QoS {
    /// Set liveliness policy.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hdds::{QoS, dds::qos::Liveliness};
    ///
    /// let qos = QoS::best_effort().liveliness(Liveliness::automatic_secs(5));
    /// ```
    pub fn liveliness(mut self, liveliness: Liveliness) -> Self {
        self.liveliness = liveliness;
        self
    }

    /// Set automatic liveliness from milliseconds.
    pub fn liveliness_automatic_millis(mut self, ms: u64) -> Self {
        self.liveliness = Liveliness::automatic_millis(ms);
        self
    }

    /// Set automatic liveliness from seconds.
    pub fn liveliness_automatic_secs(mut self, secs: u64) -> Self {
        self.liveliness = Liveliness::automatic_secs(secs);
        self
    }

    /// Set manual-by-participant liveliness from milliseconds.
    pub fn liveliness_manual_participant_millis(mut self, ms: u64) -> Self {
        self.liveliness = Liveliness::manual_participant_millis(ms);
        self
    }

    /// Set manual-by-participant liveliness from seconds.
    pub fn liveliness_manual_participant_secs(mut self, secs: u64) -> Self {
        self.liveliness = Liveliness::manual_participant_secs(secs);
        self
    }

    /// Set ownership policy.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hdds::{QoS, dds::qos::Ownership};
    ///
    /// let qos = QoS::best_effort().ownership(Ownership::shared());
    /// let qos_exclusive = QoS::best_effort().ownership(Ownership::exclusive());
    /// ```
    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Set shared ownership (multiple writers allowed).
    pub fn ownership_shared(mut self) -> Self {
        self.ownership = Ownership::shared();
        self
    }

    /// Set exclusive ownership (highest-strength writer wins).
    pub fn ownership_exclusive(mut self) -> Self {
        self.ownership = Ownership::exclusive();
        self
    }

    /// Set OWNERSHIP_STRENGTH with custom value.
    ///
    /// Only matters when OWNERSHIP is EXCLUSIVE. Higher values win.
    pub fn ownership_strength(mut self, value: i32) -> Self {
        self.ownership_strength = OwnershipStrength { value };
        self
    }

    /// Set OWNERSHIP_STRENGTH to high priority (value: 100).
    pub fn ownership_strength_high(mut self) -> Self {
        self.ownership_strength = OwnershipStrength::high();
        self
    }

    /// Set OWNERSHIP_STRENGTH to low priority (value: -100).
    pub fn ownership_strength_low(mut self) -> Self {
        self.ownership_strength = OwnershipStrength::low();
        self
    }

    /// Set partition policy.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hdds::{QoS, dds::qos::Partition};
    ///
    /// let qos = QoS::best_effort().partition(Partition::single("sensor"));
    /// ```
    pub fn partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    /// Set single partition.
    pub fn partition_single(mut self, name: &str) -> Self {
        self.partition = Partition::single(name);
        self
    }

    /// Add a partition name to the partition list.
    pub fn add_partition(mut self, name: &str) -> Self {
        self.partition.add(name);
        self
    }

    /// Set USER_DATA policy.
    ///
    /// Opaque data attached to DomainParticipant or Entity.
    pub fn user_data(mut self, user_data: UserData) -> Self {
        self.user_data = user_data;
        self
    }

    /// Set USER_DATA from byte slice.
    pub fn user_data_bytes(mut self, value: &[u8]) -> Self {
        self.user_data = UserData::new(value.to_vec());
        self
    }

    /// Set GROUP_DATA policy.
    ///
    /// Opaque data attached to Publisher or Subscriber.
    pub fn group_data(mut self, group_data: GroupData) -> Self {
        self.group_data = group_data;
        self
    }

    /// Set GROUP_DATA from byte slice.
    pub fn group_data_bytes(mut self, value: &[u8]) -> Self {
        self.group_data = GroupData::new(value.to_vec());
        self
    }

    /// Set TOPIC_DATA policy.
    ///
    /// Opaque data attached to Topic.
    pub fn topic_data(mut self, topic_data: TopicData) -> Self {
        self.topic_data = topic_data;
        self
    }

    /// Set TOPIC_DATA from byte slice.
    pub fn topic_data_bytes(mut self, value: &[u8]) -> Self {
        self.topic_data = TopicData::new(value.to_vec());
        self
    }
}
