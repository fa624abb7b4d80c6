// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builder pattern for DataReader configuration.
//!
//!
//! Provides fluent API for configuring QoS, transport, and runtime options
//! before constructing a DataReader instance.

use super::runtime::DataReader;
use super::sink::ReaderSink;
use crate::config::READER_HISTORY_RING_SIZE;
use crate::core::discovery::GUID;
use crate::core::rt;
use crate::dds::listener::DataReaderListener;
use crate::dds::qos::{History, Reliability};
use crate::dds::transport::Transport;
use crate::dds::{
    DomainState, Error, GuardCondition, MatchKey, QoS, Result, StatusCondition, StatusMask, TypeId,
    DDS,
};
use crate::reliability::{NackScheduler, ReliableMetrics};
use std::sync::{Arc, Mutex};

pub struct ReaderBuilder<T: DDS> {
    pub(super) topic: String,
    pub(super) qos: QoS,
    pub(super) transport: Option<Arc<dyn Transport>>,
    pub(super) participant_guard: Option<Arc<GuardCondition>>,
    pub(super) participant: Option<Arc<crate::Participant>>,
    pub(super) domain_state: Option<Arc<DomainState>>,
    pub(super) type_name_override: Option<String>,
    /// Listener for data callbacks
    pub(super) listener: Option<Arc<dyn DataReaderListener<T>>>,
    pub(super) _phantom: core::marker::PhantomData<T>,
}

impl<T: DDS> ReaderBuilder<T> {
    pub(crate) fn new(topic: String) -> Self {
        Self {
            topic,
            qos: QoS::best_effort(),
            transport: None,
            participant_guard: None,
            participant: None,
            domain_state: None,
            type_name_override: None,
            listener: None,
            _phantom: core::marker::PhantomData,
        }
    }

    pub(crate) fn with_participant(mut self, participant: Arc<crate::Participant>) -> Self {
        self.participant = Some(participant);
        self
    }

    pub fn qos(mut self, q: QoS) -> Self {
        self.qos = q;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_participant_guard(mut self, guard: Arc<GuardCondition>) -> Self {
        log::debug!(
            "[READER-BUILDER] attaching participant guard for topic='{}'",
            self.topic
        );
        self.participant_guard = Some(guard);
        self
    }

    pub fn with_domain_state(mut self, domain_state: Arc<DomainState>) -> Self {
        self.domain_state = Some(domain_state);
        self
    }

    pub(crate) fn with_type_name_override(mut self, type_name: impl Into<String>) -> Self {
        self.type_name_override = Some(type_name.into());
        self
    }

    /// Set a listener for data callbacks.
    ///
    /// The listener will be called when data arrives, when subscriptions
    /// are matched, and for other reader events.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use hdds::{Participant, QoS, DataReaderListener, ClosureListener};
    /// use std::sync::Arc;
    ///
    /// // Simple closure-based listener
    /// let listener = ClosureListener::new(|sample: &Temperature| {
    ///     println!("Received: {:?}", sample);
    /// });
    ///
    /// let reader = participant
    ///     .create_reader::<Temperature>("temp", QoS::default())
    ///     .with_listener(Arc::new(listener))
    ///     .build()?;
    /// ```
    pub fn with_listener(mut self, listener: Arc<dyn DataReaderListener<T>>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn build(mut self) -> Result<DataReader<T>> {
        // Extract configs from participant if not explicitly provided
        // (mirrors WriterBuilder behavior for API consistency)
        if let Some(ref participant) = self.participant {
            if self.transport.is_none() {
                self.transport = participant.transport();
            }
            if self.participant_guard.is_none() {
                self.participant_guard = Some(participant.graph_guard());
            }
            if self.domain_state.is_none() {
                self.domain_state = Some(participant.domain_state.clone());
            }
        }

        let ReaderBuilder {
            topic,
            qos,
            transport,
            participant_guard: _,
            participant,
            domain_state,
            type_name_override,
            listener: _,
            ..
        } = self;

        if matches!(qos.history, History::KeepLast(0)) {
            return Err(Error::InvalidState(
                "History::KeepLast requires depth > 0".to_string(),
            ));
        }
        if matches!(qos.history, History::KeepAll) && qos.resource_limits.max_samples == 0 {
            return Err(Error::InvalidState(
                "History::KeepAll requires ResourceLimits.max_samples > 0".to_string(),
            ));
        }

        // Ring must be larger than history depth to buffer incoming samples
        // before enforce_history() trims at read time. Use READER_HISTORY_RING_SIZE
        // as minimum to handle writer bursts without dropping newest samples.
        let ring_capacity = match qos.history {
            History::KeepLast(depth) => std::cmp::max(depth as usize, READER_HISTORY_RING_SIZE),
            History::KeepAll => {
                std::cmp::max(qos.resource_limits.max_samples, READER_HISTORY_RING_SIZE)
            }
        };
        let ring = Arc::new(rt::IndexRing::with_capacity(ring_capacity));
        let status_condition = Arc::new(StatusCondition::new());
        status_condition.set_enabled_statuses(StatusMask::DATA_AVAILABLE);

        let is_reliable = matches!(qos.reliability, Reliability::Reliable);
        let reliable_metrics = is_reliable.then(|| Arc::new(ReliableMetrics::new()));

        let nack_scheduler = if is_reliable {
            let scheduler = Arc::new(Mutex::new(NackScheduler::new()));

            if let (Some(metrics), Ok(mut guard)) = (reliable_metrics.clone(), scheduler.lock()) {
                guard.set_metrics(metrics);
            }

            Some(scheduler)
        } else {
            None
        };

        // Derive a GUID for this reader: participant prefix + an allocated
        // entity key, or a zero GUID when built without a participant
        // (e.g. in unit tests).
        let guid = if let Some(ref participant) = participant {
            let entity_id = participant.next_user_entity_id(0x04); // USER_READER_WITH_KEY-ish kind
            GUID::new(participant.guid().prefix, entity_id)
        } else {
            GUID::zero()
        };

        // Register this reader's transport sink so incoming DATA, HEARTBEAT
        // and GAP submessages addressed to it reach the reliability state
        // machine.
        if let (Some(ref transport), Some(ref scheduler)) = (&transport, &nack_scheduler) {
            let sink = Arc::new(ReaderSink::new(
                topic.clone(),
                Arc::clone(&ring),
                Arc::clone(&status_condition),
                Arc::clone(scheduler),
            ));
            transport.register_reader(guid, sink);
        }

        // Register reader in domain state for intra-process auto-binding
        let bind_token = if let Some(ref domain_state) = domain_state {
            let type_name = type_name_override.as_deref().unwrap_or_else(T::type_name);
            let type_id = TypeId::from_type_name(type_name);
            let key = MatchKey::new(topic.as_str(), type_id);

            log::debug!(
                "[ReaderBuilder] Registering reader in domain {} for topic='{}' type='{}'",
                domain_state.domain_id,
                topic,
                type_name
            );

            // Create bind callback that will be called for each matching writer
            let ring_clone = Arc::clone(&ring);
            let status_condition_clone = Arc::clone(&status_condition);

            Some(domain_state.register_reader(
                key,
                guid,
                ring.clone(),
                qos.reliability,
                move |writer_merger| {
                    // Create notification callback for status condition
                    let status_condition_for_notify = Arc::clone(&status_condition_clone);
                    let notify: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
                        status_condition_for_notify.set_active_statuses(StatusMask::DATA_AVAILABLE);
                    });

                    // Register this reader with the writer's merger
                    let registration = rt::MergerReader::new(Arc::clone(&ring_clone), notify);
                    writer_merger.add_reader(registration);
                },
            ))
        } else {
            None
        };

        Ok(DataReader::new(
            topic,
            qos,
            ring,
            guid,
            nack_scheduler,
            transport,
            reliable_metrics,
            status_condition,
            bind_token,
        ))
    }
}
