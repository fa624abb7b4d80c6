// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::heartbeat_scheduler::HeartbeatSchedulerHandle;
use crate::core::discovery::GUID;
use crate::core::rt;
use crate::dds::listener::DataWriterListener;
use crate::dds::transport::Transport;
use crate::dds::{BindToken, Error, QoS, Result, DDS};
use crate::reliability::{HeartbeatTx, HistoryCache, ReliableMetrics};
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A typed DDS DataWriter that publishes samples to a topic.
///
/// `DataWriter<T>` serializes data samples of type `T` and delivers them to matching
/// [`DataReader<T>`](crate::DataReader) instances via the configured transport.
///
/// # Type Parameter
///
/// * `T` - The data type, must implement [`DDS`](crate::dds::DDS)
///
/// # Example
///
/// ```rust,no_run
/// use hdds::{Participant, QoS, Result, DDS};
///
/// struct Temperature { sensor_id: u32, value: f32 }
/// impl DDS for Temperature {
///     fn type_name() -> &'static str { "Temperature" }
///     fn to_serdata(&self) -> Result<hdds::core::serdata::Serdata> { unimplemented!() }
///     fn from_serdata(_: &hdds::core::serdata::Serdata) -> Result<Self> { unimplemented!() }
/// }
///
/// fn main() -> Result<()> {
///     let participant = Participant::builder("temp_sensor")
///         .domain_id(0)
///         .build()?;
///
///     let writer = participant.create_writer::<Temperature>(
///         "sensors/temp",
///         QoS::reliable(),
///     )?;
///
///     writer.write(&Temperature {
///         sensor_id: 42,
///         value: 23.5,
///     })?;
///
///     Ok(())
/// }
/// ```
///
/// # Delivery Guarantees
///
/// - **Best-effort**: Fire-and-forget, no retransmission
/// - **Reliable**: Sequence tracking, heartbeats, retransmission on ACKNACK
///
/// # Thread Safety
///
/// `DataWriter<T>` is `Send + Sync` when `T` is `Send + Sync`.
pub struct DataWriter<T: DDS> {
    pub(super) topic: String,
    /// QoS policy - stored for introspection, used during build()
    pub(super) qos: QoS,
    pub(super) guid: GUID,
    pub(super) merger: Arc<rt::TopicMerger>,
    pub(super) transport: Option<Arc<dyn Transport>>,
    pub(super) next_seq: AtomicU64,
    pub(super) history_cache: Option<Arc<HistoryCache>>,
    pub(super) reliable_metrics: Option<Arc<ReliableMetrics>>,
    pub(super) heartbeat_tx: Option<RefCell<HeartbeatTx>>,
    /// Periodic heartbeat scheduler thread handle (RTPS 2.5 Section 8.4.7.2)
    /// Sends HEARTBEAT messages independently of write() calls for reliable recovery.
    pub(super) _heartbeat_scheduler: Option<HeartbeatSchedulerHandle>,
    /// BindToken for intra-process auto-binding (unregisters on drop)
    pub(super) _bind_token: Option<BindToken>,
    /// Optional listener for writer callbacks
    pub(super) listener: Option<Arc<dyn DataWriterListener<T>>>,
    pub(super) _phantom: core::marker::PhantomData<T>,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct WriterStats {
    pub messages_sent: u64,
    pub bytes_sent: u64,
    pub drops: u64,
}

impl<T: DDS> DataWriter<T> {
    #[must_use]
    pub fn qos(&self) -> &QoS {
        &self.qos
    }

    #[must_use]
    pub fn topic_name(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn guid(&self) -> GUID {
        self.guid
    }

    pub fn merger(&self) -> Arc<rt::TopicMerger> {
        Arc::clone(&self.merger)
    }

    pub fn write(&self, msg: &T) -> Result<()> {
        let write_start_ns = crate::telemetry::metrics::current_time_ns();
        let serdata = msg.to_serdata()?;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let payload: &[u8] = serdata.payload().unwrap_or(&[]);

        // Check if we have local readers - only allocate slab pool if needed
        let has_local_readers = self.merger.reader_count() > 0;
        log::debug!(
            "[writer] write() seq={} reader_count={} has_local_readers={}",
            seq,
            self.merger.reader_count(),
            has_local_readers
        );

        // Reserve intra-process resources only if there are local readers.
        // If slab pool is full (WouldBlock), gracefully skip intra-process
        // delivery but still proceed with the transport - never fail the whole write.
        let intra_process = if has_local_readers {
            match Self::prepare_intra_process_entry(payload, seq, write_start_ns) {
                Ok(entry) => Some(entry),
                Err(Error::WouldBlock) => {
                    log::debug!(
                        "[writer] slab pool full seq={}, skipping intra-process",
                        seq
                    );
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        // Hand off to the transport collaborator
        if let Some(ref transport) = self.transport {
            if let Err(e) = transport.send_data(self.guid, seq, &serdata) {
                log::debug!("transport send failed for topic '{}': {}", self.topic, e);
            } else {
                log::debug!("[writer] send succeeded topic='{}' seq={}", self.topic, seq);
            }
        }

        // Commit to merger if we have local readers
        if let Some((entry, handle)) = intra_process {
            let merger_success = self.merger.push(entry);
            log::debug!(
                "[MERGER] push topic='{}' seq={} success={} reader_count={}",
                self.topic,
                seq,
                merger_success,
                self.merger.reader_count()
            );
            if !merger_success {
                rt::get_slab_pool().release(handle);
            }
        } else {
            log::debug!(
                "[writer] No local readers for topic='{}'; remote-only delivery",
                self.topic
            );
        }

        if let Some(ref cache) = self.history_cache {
            if let Err(e) = cache.insert(seq, payload) {
                log::debug!(
                    "[writer] History cache insert failed for seq {}: {}",
                    seq,
                    e
                );
            }
        }

        self.maybe_send_heartbeat(seq);

        // Invoke listener callback if present
        if let Some(ref listener) = self.listener {
            listener.on_sample_written(msg, seq);
        }

        Ok(())
    }

    fn prepare_intra_process_entry(
        payload: &[u8],
        seq: u64,
        write_start_ns: u64,
    ) -> Result<(rt::IndexEntry, rt::SlabHandle)> {
        let serialized_len = payload.len();
        let slab_pool = rt::get_slab_pool();
        let (handle, slab_buf) = match slab_pool.reserve(serialized_len) {
            Some((h, b)) => (h, b),
            None => return Err(Error::WouldBlock),
        };

        slab_buf[..serialized_len].copy_from_slice(payload);
        slab_pool.commit(handle, serialized_len);

        let seq_u32 = match u32::try_from(seq) {
            Ok(value) => value,
            Err(_) => {
                slab_pool.release(handle);
                log::debug!(
                    "[writer] Sequence {} exceeds 32-bit limit; dropping intra-process delivery",
                    seq
                );
                return Err(Error::Unsupported);
            }
        };

        let len_u32 = match u32::try_from(serialized_len) {
            Ok(value) => value,
            Err(_) => {
                slab_pool.release(handle);
                log::debug!(
                    "[writer] Serialized payload too large ({} bytes); dropping intra-process delivery",
                    serialized_len
                );
                return Err(Error::OutOfRange(format!(
                    "payload of {serialized_len} bytes exceeds intra-process slab limit"
                )));
            }
        };

        let entry = rt::IndexEntry {
            seq: seq_u32,
            handle,
            len: len_u32,
            flags: 0x01,
            timestamp_ns: write_start_ns,
        };

        Ok((entry, handle))
    }

    #[must_use]
    pub fn stats(&self) -> WriterStats {
        WriterStats::default()
    }

    fn maybe_send_heartbeat(&self, last_seq: u64) {
        // Update scheduler state so periodic thread knows the latest seq
        if let Some(ref scheduler) = self._heartbeat_scheduler {
            scheduler.state().update_seq(last_seq);
        }

        let Some(ref transport) = self.transport else {
            return;
        };
        let Some(ref hb_tx) = self.heartbeat_tx else {
            return;
        };

        let mut hb_tx_borrow = hb_tx.borrow_mut();

        if Instant::now() < hb_tx_borrow.next_deadline() {
            return;
        }

        let first_seq = if let Some(ref cache) = self.history_cache {
            cache.oldest_seq().unwrap_or(1)
        } else {
            1
        };

        let hb = hb_tx_borrow.build_heartbeat(first_seq, last_seq);
        let heartbeat =
            crate::reliability::messages::HeartbeatMsg::new(hb.first_seq, hb.last_seq, hb.count);

        if let Err(e) = transport.send_heartbeat(self.guid, &heartbeat) {
            log::debug!("Failed to send Heartbeat: {}", e);
        } else if let Some(ref metrics) = self.reliable_metrics {
            metrics.increment_heartbeats_sent(1);
        }
    }
}
