// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::core::discovery::GUID;
use crate::dds::transport::Transport;
use crate::dds::{DomainState, GuardCondition, Publisher, Result, Subscriber, Topic};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// RTPS ENTITYID_PARTICIPANT (spec 9.3.1)
pub(super) const RTPS_ENTITYID_PARTICIPANT: [u8; 4] = [0, 0, 1, 0xC1];

/// Transport mode for DDS communication.
///
/// Determines how data written through a [`crate::DataWriter`] and read
/// through a [`crate::DataReader`] actually moves between entities.
///
/// # Variants
///
/// | Mode | Use Case |
/// |------|----------|
/// | `IntraProcess` | Same process, zero-copy ring delivery, auto-binding |
/// | `External` | Delegates send/receive to an external [`Transport`] collaborator |
///
/// # Example
///
/// ```rust,no_run
/// use hdds::{Participant, TransportMode};
///
/// // Fast intra-process for testing
/// let test_participant = Participant::builder("test")
///     .with_transport(TransportMode::IntraProcess)
///     .build()?;
/// # Ok::<(), hdds::Error>(())
/// ```
#[derive(Clone)]
pub enum TransportMode {
    /// In-process communication via the ring/slab intra-process fast path.
    ///
    /// Best for: testing, single-process applications, maximum performance.
    /// Limitation: cannot communicate with other processes.
    IntraProcess,

    /// Delegates all wire traffic to an externally supplied [`Transport`].
    ///
    /// The transport owns sockets, wire encoding and fragmentation; this
    /// crate only hands it GUIDs and already-encoded pieces to send.
    External(Arc<dyn Transport>),
}

impl std::fmt::Debug for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::IntraProcess => write!(f, "IntraProcess"),
            TransportMode::External(_) => write!(f, "External(..)"),
        }
    }
}

/// DDS Domain Participant - the entry point to the HDDS middleware.
///
/// A `Participant` represents a single node in a DDS domain. It is the factory
/// for all DDS entities (publishers, subscribers, topics, readers, writers).
///
/// # Creating a Participant
///
/// Use the builder pattern via [`Participant::builder`]:
///
/// ```rust,no_run
/// use hdds::{Participant, TransportMode};
///
/// let participant = Participant::builder("my_app")
///     .domain_id(0)
///     .build()?;
/// # Ok::<(), hdds::Error>(())
/// ```
///
/// # Thread Safety
///
/// `Participant` is wrapped in `Arc<Participant>` after creation and is
/// `Send + Sync`. All methods that create entities take `&Arc<Self>`.
///
/// # See Also
///
/// - `ParticipantBuilder` - Configuration options
/// - [DDS Spec Sec.2.2.1](https://www.omg.org/spec/DDS/1.4/) - DomainParticipant
pub struct Participant {
    pub(super) name: String,
    pub(super) transport_mode: TransportMode,
    pub(super) domain_id: u32,
    pub(super) participant_id: u8,
    pub(super) guid: GUID,
    pub(super) graph_guard: Arc<GuardCondition>,
    /// Incremental key allocator for user entity IDs (ensures unique GUIDs per endpoint)
    pub(super) next_entity_key: AtomicU32,
    /// Domain state for intra-process auto-binding
    pub(crate) domain_state: Arc<DomainState>,
    pub(super) telemetry_shutdown: Arc<AtomicBool>,
    pub(super) telemetry_handle: Option<JoinHandle<()>>,
}

impl Participant {
    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    pub fn participant_id(&self) -> u8 {
        self.participant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transport_mode(&self) -> &TransportMode {
        &self.transport_mode
    }

    /// The external transport, if this participant was built with one.
    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        match &self.transport_mode {
            TransportMode::External(t) => Some(t.clone()),
            TransportMode::IntraProcess => None,
        }
    }

    pub fn guid(&self) -> GUID {
        self.guid
    }

    pub fn topic<T: crate::dds::DDS>(self: &Arc<Self>, name: &str) -> Result<Topic<T>> {
        Ok(Topic::new(name.to_string(), Arc::clone(self)))
    }

    pub fn create_publisher(self: &Arc<Self>, qos: crate::dds::QoS) -> Result<Publisher> {
        Ok(Publisher::new(qos, self.transport(), Some(Arc::clone(self))))
    }

    pub fn create_subscriber(self: &Arc<Self>, qos: crate::dds::QoS) -> Result<Subscriber> {
        Ok(Subscriber::new(qos, self.transport(), Some(Arc::clone(self))))
    }

    /// Access the participant-level discovery guard condition.
    #[must_use]
    pub fn graph_guard(&self) -> Arc<GuardCondition> {
        Arc::clone(&self.graph_guard)
    }

    pub fn create_writer<T: crate::dds::DDS>(
        self: &Arc<Self>,
        topic: &str,
        qos: crate::dds::QoS,
    ) -> Result<crate::dds::DataWriter<T>> {
        let mut builder = self.topic(topic)?.writer().qos(qos);

        if let Some(transport) = self.transport() {
            builder = builder.with_transport(transport);
        }

        builder = builder.with_domain_state(self.domain_state.clone());
        builder.build()
    }

    pub fn create_reader<T: crate::dds::DDS>(
        self: &Arc<Self>,
        topic: &str,
        qos: crate::dds::QoS,
    ) -> Result<crate::dds::DataReader<T>> {
        let mut builder = self.topic(topic)?.reader().qos(qos);

        if let Some(transport) = self.transport() {
            builder = builder.with_transport(transport);
        }

        builder = builder.with_participant_guard(self.graph_guard());
        builder = builder.with_domain_state(self.domain_state.clone());

        builder.build()
    }

    pub(crate) fn next_user_entity_id(&self, entity_kind: u8) -> [u8; 4] {
        let key = (self.next_entity_key.fetch_add(1, Ordering::Relaxed) + 1) & 0x00FF_FFFF;
        let key_bytes = key.to_le_bytes();
        [key_bytes[0], key_bytes[1], key_bytes[2], entity_kind]
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("domain_id", &self.domain_id)
            .field("participant_id", &self.participant_id)
            .field("guid", &self.guid)
            .finish()
    }
}

impl Drop for Participant {
    fn drop(&mut self) {
        self.telemetry_shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.telemetry_handle.take() {
            let _ = handle.join();
        }
    }
}
