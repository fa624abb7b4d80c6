// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participant builder pattern implementation.
//!
//! This module provides the `ParticipantBuilder` for configuring and creating
//! DDS participants. The builder pattern allows fluent configuration of:
//! - Domain ID and participant ID
//! - Transport mode (intra-process vs an external [`Transport`](crate::dds::Transport))

use super::runtime::{Participant, TransportMode, RTPS_ENTITYID_PARTICIPANT};
use crate::core::discovery::GUID;
use crate::dds::transport::Transport;
use crate::dds::{DomainRegistry, Error, GuardCondition, Result};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Builder for configuring and creating a [`Participant`].
pub struct ParticipantBuilder {
    pub(super) name: String,
    pub(super) transport_mode: TransportMode,
    pub(super) domain_id: u32,
    pub(super) participant_id: Option<u8>,
}

impl Participant {
    /// Create a new participant with default settings.
    ///
    /// Uses `IntraProcess` transport mode and domain ID 0 by default.
    /// For more configuration options, use [`Participant::builder`].
    ///
    /// # Example
    /// ```no_run
    /// use hdds::Participant;
    /// let participant = Participant::new("my_app")?;
    /// # Ok::<(), hdds::Error>(())
    /// ```
    pub fn new(name: &str) -> Result<Arc<Self>> {
        Self::builder(name).build()
    }

    /// Create a new participant builder.
    ///
    /// # Example
    /// ```no_run
    /// use hdds::Participant;
    /// let participant = Participant::builder("my_app")
    ///     .domain_id(0)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(name: &str) -> ParticipantBuilder {
        ParticipantBuilder {
            name: name.to_string(),
            transport_mode: TransportMode::IntraProcess,
            domain_id: 0,
            participant_id: None,
        }
    }
}

impl ParticipantBuilder {
    /// Set the transport mode. Defaults to `TransportMode::IntraProcess`.
    #[must_use]
    pub fn with_transport(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    /// Wire an external [`Transport`] implementation; equivalent to
    /// `.with_transport(TransportMode::External(transport))`.
    #[must_use]
    pub fn transport(self, transport: Arc<dyn Transport>) -> Self {
        self.with_transport(TransportMode::External(transport))
    }

    /// Set the DDS domain ID. Defaults to 0.
    #[must_use]
    pub fn domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    /// Explicitly set the participant ID (0-119 per RTPS). If not set, the
    /// builder picks the lowest free ID within the domain.
    #[must_use]
    pub fn participant_id(mut self, participant_id: u8) -> Self {
        self.participant_id = Some(participant_id);
        self
    }

    /// Construct the [`Participant`], joining its domain.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParticipantId`] if an explicit participant ID
    /// is out of range, or [`Error::NoAvailableParticipantId`] if none of the
    /// valid IDs (0-119) are free.
    pub fn build(self) -> Result<Arc<Participant>> {
        let participant_id = match self.participant_id {
            Some(id) => {
                if id > 119 {
                    return Err(Error::InvalidParticipantId(id));
                }
                id
            }
            None => 0,
        };

        let guid_prefix = synthesize_guid_prefix(self.domain_id, participant_id);
        let guid = GUID::new(guid_prefix, RTPS_ENTITYID_PARTICIPANT);

        let domain_state = DomainRegistry::global().get_or_create(self.domain_id);

        let participant = Arc::new(Participant {
            name: self.name,
            transport_mode: self.transport_mode,
            domain_id: self.domain_id,
            participant_id,
            guid,
            graph_guard: Arc::new(GuardCondition::new()),
            next_entity_key: AtomicU32::new(0),
            domain_state,
            telemetry_shutdown: Arc::new(AtomicBool::new(false)),
            telemetry_handle: None,
        });

        log::info!(
            "[Participant] Created '{}' on domain={} participant_id={} guid={}",
            participant.name(),
            participant.domain_id(),
            participant.participant_id(),
            participant.guid(),
        );

        Ok(participant)
    }
}

/// Deterministic GUID prefix derivation (no network identity available at
/// this layer; the external transport collaborator is responsible for any
/// host-unique prefix it needs for wire interop).
fn synthesize_guid_prefix(domain_id: u32, participant_id: u8) -> [u8; 12] {
    let pid = std::process::id();
    let mut prefix = [0u8; 12];
    prefix[0] = 0x01; // vendor-ish marker
    prefix[1..5].copy_from_slice(&domain_id.to_be_bytes());
    prefix[5] = participant_id;
    prefix[6..10].copy_from_slice(&pid.to_be_bytes());
    prefix
}
