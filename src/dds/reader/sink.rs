// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport callback sink for DataReader.
//!
//! Feeds DATA samples into the reader's ring, and drives the reliability
//! state machine (gap detection, NACK scheduling) from incoming HEARTBEAT
//! and GAP submessages.
//!
//! ## RTPS Reliable Protocol Flow
//!
//! ```text
//! Writer                              Reader
//!   ├──DATA(1,2,4,5)─────────────────────▶  (3 missing)
//!   ├──HEARTBEAT(first=1,last=5)────────▶
//!   │                                   │  ← This module handles both
//!   ◀──────────ACKNACK(missing={3})─────┤
//! ```

use crate::core::discovery::GUID;
use crate::core::rt;
use crate::core::serdata::{Serdata, SerdataKind};
use crate::dds::transport::ReaderTransportSink;
use crate::dds::{StatusCondition, StatusMask};
use crate::reliability::{GapMsg, GapRx, HeartbeatMsg, HeartbeatRx, NackScheduler, RtpsRange};
use std::borrow::Cow;
use std::sync::{Arc, Mutex};

pub(super) struct ReaderSink {
    topic: String,
    ring: Arc<rt::IndexRing>,
    status_condition: Arc<StatusCondition>,
    nack_scheduler: Arc<Mutex<NackScheduler>>,
    heartbeat_rx: Mutex<HeartbeatRx>,
    gap_rx: Mutex<GapRx>,
    last_seen: Mutex<u64>,
}

impl ReaderSink {
    pub fn new(
        topic: String,
        ring: Arc<rt::IndexRing>,
        status_condition: Arc<StatusCondition>,
        nack_scheduler: Arc<Mutex<NackScheduler>>,
    ) -> Self {
        Self {
            topic,
            ring,
            status_condition,
            nack_scheduler,
            heartbeat_rx: Mutex::new(HeartbeatRx::new()),
            gap_rx: Mutex::new(GapRx::new()),
            last_seen: Mutex::new(0),
        }
    }
}

impl ReaderTransportSink for ReaderSink {
    fn on_data(&self, remote_writer: GUID, seq: u64, serdata: &Serdata) {
        // Key-only samples (dispose/unregister) carry no data payload; the RHC
        // needs the instance key hash instead, tagged with the relevant status
        // bits so `pump_ring_to_cache` can drive the instance-state transition
        // without attempting to decode `T` from an empty buffer.
        let (payload, kind_flags): (Cow<'_, [u8]>, u8) = match serdata.kind() {
            SerdataKind::Data => (Cow::Borrowed(serdata.payload().unwrap_or(&[])), 0),
            SerdataKind::Key => {
                let mut flags = rt::KEY_ONLY_FLAG;
                if serdata.is_disposed() {
                    flags |= rt::DISPOSED_FLAG;
                }
                if serdata.is_unregistered() {
                    flags |= rt::UNREGISTERED_FLAG;
                }
                (Cow::Owned(serdata.key_hash().to_be_bytes().to_vec()), flags)
            }
        };
        let slab_pool = rt::get_slab_pool();

        match slab_pool.reserve(payload.len()) {
            Some((handle, buf)) => {
                buf[..payload.len()].copy_from_slice(&payload);
                slab_pool.commit(handle, payload.len());

                let seq_u32 = match u32::try_from(seq) {
                    Ok(v) => v,
                    Err(_) => {
                        slab_pool.release(handle);
                        log::debug!(
                            "[reader] topic='{}' seq {} exceeds 32-bit ring limit, dropping",
                            self.topic,
                            seq
                        );
                        return;
                    }
                };
                let len_u32 = match u32::try_from(payload.len()) {
                    Ok(v) => v,
                    Err(_) => {
                        slab_pool.release(handle);
                        log::debug!(
                            "[reader] topic='{}' payload of {} bytes too large for ring, dropping",
                            self.topic,
                            payload.len()
                        );
                        return;
                    }
                };

                let entry = rt::IndexEntry {
                    seq: seq_u32,
                    handle,
                    len: len_u32,
                    flags: 0x01 | kind_flags,
                    timestamp_ns: crate::telemetry::metrics::current_time_ns(),
                };

                if self.ring.push(entry) {
                    self.status_condition
                        .set_active_statuses(StatusMask::DATA_AVAILABLE);
                } else {
                    slab_pool.release(handle);
                }
            }
            None => {
                log::debug!(
                    "[reader] topic='{}' slab pool full, dropping sample from {} seq={}",
                    self.topic,
                    remote_writer,
                    seq
                );
            }
        }

        if let Ok(mut sched) = self.nack_scheduler.lock() {
            sched.on_receive(seq);
        }
        if let Ok(mut last_seen) = self.last_seen.lock() {
            *last_seen = (*last_seen).max(seq);
        }
    }

    fn on_heartbeat(&self, remote_writer: GUID, heartbeat: &HeartbeatMsg) {
        let reader_last_seen = match self.last_seen.lock() {
            Ok(lock) => *lock,
            Err(err) => *err.into_inner(),
        };

        let mut hb_rx = match self.heartbeat_rx.lock() {
            Ok(lock) => lock,
            Err(err) => err.into_inner(),
        };

        let gap_detected = hb_rx.on_heartbeat(heartbeat, reader_last_seen).is_some();
        drop(hb_rx);

        if gap_detected {
            log::debug!(
                "[reader] topic='{}' heartbeat from {} reveals gap up to seq={}",
                self.topic,
                remote_writer,
                heartbeat.last_seq
            );
            if let Ok(mut sched) = self.nack_scheduler.lock() {
                sched.on_receive(heartbeat.last_seq);
            }
        }
    }

    fn on_gap(&self, remote_writer: GUID, gap: &GapMsg) {
        let ranges = {
            let mut gap_rx = match self.gap_rx.lock() {
                Ok(lock) => lock,
                Err(err) => err.into_inner(),
            };
            gap_rx.on_gap(gap)
        };

        log::debug!(
            "[reader] topic='{}' GAP from {} covering {} range(s)",
            self.topic,
            remote_writer,
            ranges.len()
        );

        if let Ok(mut sched) = self.nack_scheduler.lock() {
            sched.mark_lost_ranges(ranges.into_iter().map(|r| RtpsRange::new(r.start, r.end)));
        }
    }
}
