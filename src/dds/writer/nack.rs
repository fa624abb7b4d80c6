// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ACKNACK processing for DataWriter.
//!
//! Handles incoming NACKs from readers and triggers retransmission of
//! missing samples from the history cache.
//!
//! ## RTPS Reliable Protocol Flow
//!
//! ```text
//! Writer                              Reader
//!   ├──DATA(1,2,3,4,5)──────────────────▶  (3 lost)
//!   ├──HEARTBEAT(first=1,last=5)────────▶
//!   │                                   │
//!   ◀──────────ACKNACK(missing={3})─────┤
//!   │                                   │
//!   ├──DATA(3) retransmit───────────────▶  ← This module handles this
//! ```

use crate::core::discovery::GUID;
use crate::core::serdata::Serdata;
use crate::dds::transport::{Transport, WriterTransportSink};
use crate::reliability::{GapTx, HistoryCache, NackMsg, ReliableMetrics, WriterRetransmitHandler};
use std::sync::{Arc, Mutex};

pub(super) struct WriterNackHandler {
    topic: String,
    guid: GUID,
    cache: Arc<HistoryCache>,
    transport: Arc<dyn Transport>,
    metrics: Arc<ReliableMetrics>,
    gap_tx: Mutex<GapTx>,
}

impl WriterNackHandler {
    pub fn new(
        topic: String,
        guid: GUID,
        cache: Arc<HistoryCache>,
        transport: Arc<dyn Transport>,
        metrics: Arc<ReliableMetrics>,
    ) -> Self {
        Self {
            topic,
            guid,
            cache,
            transport,
            metrics,
            gap_tx: Mutex::new(GapTx::new()),
        }
    }
}

impl WriterTransportSink for WriterNackHandler {
    fn on_nack(&self, remote_reader: GUID, nack: &NackMsg) {
        log::debug!(
            "[writer] on_nack topic={} from reader={} missing_ranges={}",
            self.topic,
            remote_reader,
            nack.ranges.len()
        );

        // Skip if no missing ranges (pure ACK - reader is caught up)
        if nack.ranges.is_empty() {
            log::debug!("[writer] ACKNACK is pure ACK (no gaps) - reader is synchronized");
            return;
        }

        let (retransmits, gaps) = {
            let mut gap_tx = match self.gap_tx.lock() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    log::debug!("[writer] WARNING: GAP transmitter lock poisoned, recovering");
                    poisoned.into_inner()
                }
            };

            let mut handler = WriterRetransmitHandler::new(&self.cache, &mut gap_tx, &self.metrics);
            handler.on_nack(nack)
        };

        log::debug!(
            "[writer] WriterRetransmitHandler returned {} retransmits, {} gaps for topic={}",
            retransmits.len(),
            gaps.len(),
            self.topic
        );

        for (seq, payload) in retransmits {
            let serdata = Serdata::new_data(0, 0, Arc::from(payload.into_boxed_slice()));
            if let Err(e) = self.transport.send_data(self.guid, seq, &serdata) {
                log::debug!("[writer] Retransmit failed for seq {}: {}", seq, e);
            } else {
                self.metrics.retransmit_sent();
            }
        }

        for gap in gaps {
            if let Err(e) = self.transport.send_gap(self.guid, &gap) {
                log::debug!(
                    "[writer] Failed to send GAP start={} base={}: {}",
                    gap.gap_start(),
                    gap.gap_list().base(),
                    e
                );
            }
        }
    }
}
