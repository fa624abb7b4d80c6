// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sample cache for DataReader with read/take semantics.
//!
//! This module provides a cache that supports both DDS `read()` (non-destructive)
//! and `take()` (destructive) operations on received samples.
//!
//! # Architecture
//!
//! ```text
//! Buffer: [S0][S1][S2][S3][S4][S5]
//!          ^              ^
//!          |              |
//!     take_cursor    write_cursor
//!
//! read()  -> peek from take_cursor, marks sample as READ
//! take()  -> removes sample, advances take_cursor
//! ```

use crate::qos::ownership::{OwnershipArbiter, OwnershipKind};
use crate::qos::time_based_filter::{TimeBasedFilter, TimeBasedFilterChecker};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Sample state per DDS spec (NOT_READ vs READ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleState {
    /// Sample has not been read yet.
    NotRead,
    /// Sample has been accessed via `read()`.
    Read,
}

/// Instance state per DDS spec section 2.2.2.5.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// A writer is actively publishing this instance.
    Alive,
    /// The instance's writer explicitly disposed it.
    NotAliveDisposed,
    /// No writer is registered for this instance anymore (all unregistered).
    NotAliveNoWriters,
}

/// View state per DDS spec section 2.2.2.5.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// This is the first time the reader has seen this instance (or it has
    /// just reappeared after a NOT_ALIVE generation).
    New,
    /// The reader has already observed a sample of this instance.
    NotNew,
}

/// Per-instance bookkeeping backing the instance/view-state contract, plus
/// the EXCLUSIVE-ownership arbiter and TIME_BASED_FILTER checker for that
/// instance.
struct InstanceRecord {
    instance_state: InstanceState,
    view_state: ViewState,
    writers: HashSet<u64>,
    disposed_generation: u64,
    no_writers_generation: u64,
    ownership: OwnershipArbiter,
    time_filter: Option<TimeBasedFilterChecker>,
}

impl InstanceRecord {
    fn new_alive(writer_iid: u64, time_based_filter: TimeBasedFilter) -> Self {
        let mut writers = HashSet::new();
        writers.insert(writer_iid);
        Self {
            instance_state: InstanceState::Alive,
            view_state: ViewState::New,
            writers,
            disposed_generation: 0,
            no_writers_generation: 0,
            ownership: OwnershipArbiter::new(),
            time_filter: if time_based_filter.is_disabled() {
                None
            } else {
                Some(TimeBasedFilterChecker::new(time_based_filter))
            },
        }
    }
}

/// Instance handle for keyed topics (16-byte key hash).
///
/// This is the DDS-standard instance identifier computed from @key fields.
/// For keyless topics, this is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstanceHandle(pub [u8; 16]);

impl InstanceHandle {
    /// Create a new instance handle from a key hash.
    pub const fn new(key_hash: [u8; 16]) -> Self {
        Self(key_hash)
    }

    /// Create a nil (all zeros) instance handle for keyless topics.
    pub const fn nil() -> Self {
        Self([0u8; 16])
    }

    /// Check if this is a nil handle.
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 16]
    }

    /// Get the raw key hash bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// Cached sample with metadata.
#[derive(Debug)]
pub struct CachedSample<T> {
    /// The actual data.
    pub data: T,
    /// Sequence number from writer.
    pub seq: u64,
    /// Reception timestamp (nanoseconds since epoch).
    pub timestamp_ns: u64,
    /// Instance handle (key hash for keyed topics).
    pub instance_handle: InstanceHandle,
    /// Identity of the writer that produced this sample, for OWNERSHIP
    /// arbitration and NOT_ALIVE_NO_WRITERS tracking.
    pub writer_iid: u64,
    /// The writer's OWNERSHIP_STRENGTH, consulted only under EXCLUSIVE ownership.
    pub writer_strength: i32,
    /// Sample state (NOT_READ vs READ).
    state: AtomicBool, // false = NotRead, true = Read
}

impl<T: Clone> Clone for CachedSample<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            seq: self.seq,
            timestamp_ns: self.timestamp_ns,
            instance_handle: self.instance_handle,
            writer_iid: self.writer_iid,
            writer_strength: self.writer_strength,
            state: AtomicBool::new(self.state.load(Ordering::Relaxed)),
        }
    }
}

impl<T> CachedSample<T> {
    /// Create a new cached sample (keyless topic, nil instance handle).
    #[allow(dead_code)] // DDS API - available for DataReader extensions
    pub fn new(data: T, seq: u64, timestamp_ns: u64) -> Self {
        Self::with_instance(data, seq, timestamp_ns, InstanceHandle::nil())
    }

    /// Create a new cached sample with an instance handle (keyed topic).
    pub fn with_instance(
        data: T,
        seq: u64,
        timestamp_ns: u64,
        instance_handle: InstanceHandle,
    ) -> Self {
        Self::with_origin(data, seq, timestamp_ns, instance_handle, 0, 0)
    }

    /// Create a cached sample carrying full writer-origin metadata, used for
    /// OWNERSHIP arbitration and NOT_ALIVE_NO_WRITERS bookkeeping.
    pub fn with_origin(
        data: T,
        seq: u64,
        timestamp_ns: u64,
        instance_handle: InstanceHandle,
        writer_iid: u64,
        writer_strength: i32,
    ) -> Self {
        Self {
            data,
            seq,
            timestamp_ns,
            instance_handle,
            writer_iid,
            writer_strength,
            state: AtomicBool::new(false), // NotRead
        }
    }

    /// Get sample state.
    pub fn sample_state(&self) -> SampleState {
        if self.state.load(Ordering::Relaxed) {
            SampleState::Read
        } else {
            SampleState::NotRead
        }
    }

    /// Mark sample as read.
    pub fn mark_read(&self) {
        self.state.store(true, Ordering::Relaxed);
    }
}

/// Sample cache with read/take cursor semantics.
///
/// Supports DDS-compliant read (non-destructive) and take (destructive) operations.
pub struct SampleCache<T> {
    /// Ring buffer of cached samples.
    buffer: Mutex<VecDeque<CachedSample<T>>>,
    /// Read cursor position (for read operations).
    /// Samples before this cursor have been read at least once.
    read_cursor: AtomicUsize,
    /// Maximum number of samples to keep (history depth).
    max_samples: usize,
    /// Total samples received (for stats).
    total_received: AtomicUsize,
    /// Per-instance state: instance/view state, ownership arbitration and
    /// the time-based filter checker.
    instances: Mutex<HashMap<InstanceHandle, InstanceRecord>>,
    /// Reader's OWNERSHIP kind; arbitration only applies under EXCLUSIVE.
    ownership_kind: OwnershipKind,
    /// Reader's TIME_BASED_FILTER; disabled filters skip the checker entirely.
    time_based_filter: TimeBasedFilter,
}

impl<T> SampleCache<T> {
    /// Create a new sample cache with given history depth (SHARED ownership,
    /// no time-based filtering).
    pub fn new(max_samples: usize) -> Self {
        Self::with_qos(max_samples, OwnershipKind::Shared, TimeBasedFilter::zero())
    }

    /// Create a new sample cache configured from the reader's OWNERSHIP and
    /// TIME_BASED_FILTER policies.
    pub fn with_qos(
        max_samples: usize,
        ownership_kind: OwnershipKind,
        time_based_filter: TimeBasedFilter,
    ) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(max_samples)),
            read_cursor: AtomicUsize::new(0),
            max_samples,
            total_received: AtomicUsize::new(0),
            instances: Mutex::new(HashMap::new()),
            ownership_kind,
            time_based_filter,
        }
    }

    /// Push a new sample into the cache.
    ///
    /// If cache is full (at max_samples), removes oldest sample. Samples are
    /// first run through the instance-level contract: an EXCLUSIVE-ownership
    /// writer with insufficient strength, or a sample arriving before
    /// TIME_BASED_FILTER's minimum separation has elapsed, is dropped before
    /// it ever reaches the ring.
    pub fn push(&self, sample: CachedSample<T>) {
        if !self.accept_for_instance(sample.instance_handle, sample.writer_iid, sample.writer_strength) {
            log::debug!(
                "[CACHE] instance contract rejected seq={} handle={:?}",
                sample.seq,
                sample.instance_handle
            );
            return;
        }

        let mut buffer = self.buffer.lock();

        // Dedup: reject if a sample with same seq already in buffer
        if buffer.iter().any(|s| s.seq == sample.seq) {
            log::warn!("[CACHE] dedup: dropping duplicate seq={}", sample.seq);
            return;
        }

        // Enforce history depth
        while buffer.len() >= self.max_samples {
            buffer.pop_front();
            // Adjust read cursor if it was pointing to removed sample
            let cursor = self.read_cursor.load(Ordering::Relaxed);
            if cursor > 0 {
                self.read_cursor.store(cursor - 1, Ordering::Relaxed);
            }
        }

        buffer.push_back(sample);
        self.total_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Run a would-be sample through the instance-state/ownership/time-filter
    /// contract. Returns `false` if the sample must be dropped.
    fn accept_for_instance(&self, handle: InstanceHandle, writer_iid: u64, writer_strength: i32) -> bool {
        let mut instances = self.instances.lock();
        let record = instances
            .entry(handle)
            .or_insert_with(|| InstanceRecord::new_alive(writer_iid, self.time_based_filter));

        // A writer resuming publication after DISPOSED/NO_WRITERS starts a
        // fresh generation: the instance is ALIVE again and NEW to the reader.
        if record.instance_state != InstanceState::Alive {
            record.instance_state = InstanceState::Alive;
            record.view_state = ViewState::New;
            record.ownership.reset();
        }
        record.writers.insert(writer_iid);

        if self.ownership_kind == OwnershipKind::Exclusive
            && !record.ownership.can_publish(writer_strength)
        {
            return false;
        }

        if let Some(checker) = &mut record.time_filter {
            if !checker.should_accept() {
                return false;
            }
            checker.mark_accepted();
        }

        true
    }

    /// Mark an instance's samples as observed (view_state -> NOT_NEW).
    fn mark_instance_observed(&self, handle: InstanceHandle) {
        if let Some(record) = self.instances.lock().get_mut(&handle) {
            record.view_state = ViewState::NotNew;
        }
    }

    /// Record that `writer_iid` disposed `handle` (DDS `dispose()`).
    ///
    /// Transitions the instance to `NOT_ALIVE_DISPOSED` and bumps its
    /// disposed-generation counter. Does not enqueue a sample: `T` has no
    /// representation for "no data", so applications observe the transition
    /// via [`instance_state`](Self::instance_state) rather than an invalid
    /// sample in the `take()`/`read()` stream.
    pub fn dispose_instance(&self, handle: InstanceHandle, writer_iid: u64) {
        let mut instances = self.instances.lock();
        let record = instances
            .entry(handle)
            .or_insert_with(|| InstanceRecord::new_alive(writer_iid, self.time_based_filter));
        record.writers.insert(writer_iid);
        if record.instance_state != InstanceState::NotAliveDisposed {
            record.instance_state = InstanceState::NotAliveDisposed;
            record.disposed_generation += 1;
        }
    }

    /// Record that `writer_iid` unregistered `handle` (DDS
    /// `unregister_instance()`).
    ///
    /// Transitions the instance to `NOT_ALIVE_NO_WRITERS` once every writer
    /// that has ever published it has unregistered.
    pub fn unregister_writer(&self, handle: InstanceHandle, writer_iid: u64) {
        let mut instances = self.instances.lock();
        let Some(record) = instances.get_mut(&handle) else {
            return;
        };
        record.writers.remove(&writer_iid);
        if record.writers.is_empty() && record.instance_state == InstanceState::Alive {
            record.instance_state = InstanceState::NotAliveNoWriters;
            record.no_writers_generation += 1;
        }
    }

    /// Current instance state for `handle`.
    ///
    /// Unknown instances (no sample or dispose/unregister ever observed)
    /// report `Alive`, matching the DDS default for a handle the reader has
    /// not yet heard about.
    #[must_use]
    pub fn instance_state(&self, handle: InstanceHandle) -> InstanceState {
        self.instances
            .lock()
            .get(&handle)
            .map_or(InstanceState::Alive, |r| r.instance_state)
    }

    /// Current view state for `handle`.
    #[must_use]
    pub fn view_state(&self, handle: InstanceHandle) -> ViewState {
        self.instances
            .lock()
            .get(&handle)
            .map_or(ViewState::New, |r| r.view_state)
    }

    /// Disposed-generation count for `handle` (bumped on each dispose).
    #[must_use]
    pub fn disposed_generation(&self, handle: InstanceHandle) -> u64 {
        self.instances
            .lock()
            .get(&handle)
            .map_or(0, |r| r.disposed_generation)
    }

    /// No-writers-generation count for `handle` (bumped when all writers
    /// unregister).
    #[must_use]
    pub fn no_writers_generation(&self, handle: InstanceHandle) -> u64 {
        self.instances
            .lock()
            .get(&handle)
            .map_or(0, |r| r.no_writers_generation)
    }

    /// Number of samples currently in cache.
    #[allow(dead_code)] // DDS API - diagnostics
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Total samples received since creation.
    #[allow(dead_code)] // DDS API - diagnostics
    pub fn total_received(&self) -> usize {
        self.total_received.load(Ordering::Relaxed)
    }
}

impl<T> SampleCache<T> {
    /// Take a single sample, removing it from cache (DDS take semantics).
    ///
    /// Returns and removes the oldest sample.
    /// Returns `None` if cache is empty.
    pub fn take(&self) -> Option<T> {
        let mut buffer = self.buffer.lock();

        if buffer.is_empty() {
            return None;
        }

        let sample = buffer.pop_front()?;
        drop(buffer);

        // Adjust read cursor
        let cursor = self.read_cursor.load(Ordering::Relaxed);
        if cursor > 0 {
            self.read_cursor.store(cursor - 1, Ordering::Relaxed);
        }

        self.mark_instance_observed(sample.instance_handle);
        Some(sample.data)
    }

    /// Take up to `max` samples, removing them from cache.
    #[allow(dead_code)] // DDS API - batch operations
    pub fn take_batch(&self, max: usize) -> Vec<T> {
        let mut buffer = self.buffer.lock();
        let count = max.min(buffer.len());
        let mut result = Vec::with_capacity(count);
        let mut handles = Vec::with_capacity(count);

        for _ in 0..count {
            if let Some(sample) = buffer.pop_front() {
                handles.push(sample.instance_handle);
                result.push(sample.data);
            }
        }
        drop(buffer);

        // Reset read cursor (samples removed from front)
        let cursor = self.read_cursor.load(Ordering::Relaxed);
        let new_cursor = cursor.saturating_sub(count);
        self.read_cursor.store(new_cursor, Ordering::Relaxed);

        for handle in handles {
            self.mark_instance_observed(handle);
        }
        result
    }

    /// Reset read cursor to beginning (re-read all samples).
    #[allow(dead_code)] // DDS API - cursor management
    pub fn reset_read_cursor(&self) {
        self.read_cursor.store(0, Ordering::Relaxed);
    }

    /// Clear all samples from cache.
    #[allow(dead_code)] // DDS API - cache management
    pub fn clear(&self) {
        let mut buffer = self.buffer.lock();
        buffer.clear();
        self.read_cursor.store(0, Ordering::Relaxed);
    }

    /// Take a single sample for a specific instance, removing it (DDS take_instance).
    ///
    /// Returns and removes the oldest sample matching the given instance handle.
    /// Uses linear scan O(n) - acceptable for v1.0.
    ///
    /// # Arguments
    /// * `handle` - The instance handle to filter by
    ///
    /// # Returns
    /// * `Some(data)` if a matching sample was found and removed
    /// * `None` if no matching sample exists
    pub fn take_instance(&self, handle: InstanceHandle) -> Option<T> {
        let mut buffer = self.buffer.lock();

        // Linear scan to find first matching instance
        let pos = buffer.iter().position(|s| s.instance_handle == handle)?;

        let sample = buffer.remove(pos)?;
        drop(buffer);

        // Adjust read cursor if we removed a sample before it
        let cursor = self.read_cursor.load(Ordering::Relaxed);
        if pos < cursor {
            self.read_cursor.store(cursor - 1, Ordering::Relaxed);
        }

        self.mark_instance_observed(sample.instance_handle);
        Some(sample.data)
    }

    /// Take up to `max` samples for a specific instance, removing them.
    ///
    /// Returns and removes samples matching the given instance handle.
    /// Uses linear scan O(n*max) - acceptable for v1.0.
    ///
    /// # Arguments
    /// * `handle` - The instance handle to filter by
    /// * `max` - Maximum number of samples to take
    pub fn take_instance_batch(&self, handle: InstanceHandle, max: usize) -> Vec<T> {
        let mut buffer = self.buffer.lock();
        let mut result = Vec::with_capacity(max);
        let mut removed_before_cursor = 0;
        let cursor = self.read_cursor.load(Ordering::Relaxed);

        // Collect indices to remove (in reverse order to not invalidate indices)
        let indices: Vec<usize> = buffer
            .iter()
            .enumerate()
            .filter(|(_, s)| s.instance_handle == handle)
            .take(max)
            .map(|(i, _)| i)
            .collect();

        // Remove in reverse order to maintain valid indices
        for &idx in indices.iter().rev() {
            if let Some(sample) = buffer.remove(idx) {
                result.push(sample.data);
                if idx < cursor {
                    removed_before_cursor += 1;
                }
            }
        }
        drop(buffer);

        // Adjust read cursor
        if removed_before_cursor > 0 {
            let new_cursor = cursor.saturating_sub(removed_before_cursor);
            self.read_cursor.store(new_cursor, Ordering::Relaxed);
        }

        self.mark_instance_observed(handle);

        // Results are in reverse order, fix that
        result.reverse();
        result
    }
}

// Read operations require T: Clone (samples are copied, not moved)
impl<T: Clone> SampleCache<T> {
    /// Read a single sample without removing it (DDS read semantics).
    ///
    /// Returns the next unread sample and marks it as READ.
    /// Returns `None` if no unread samples available.
    pub fn read(&self) -> Option<T> {
        let buffer = self.buffer.lock();
        let cursor = self.read_cursor.load(Ordering::Relaxed);

        if cursor >= buffer.len() {
            return None;
        }

        let sample = &buffer[cursor];
        sample.mark_read();
        let handle = sample.instance_handle;
        let data = sample.data.clone();

        // Advance read cursor
        self.read_cursor.store(cursor + 1, Ordering::Relaxed);
        drop(buffer);

        self.mark_instance_observed(handle);
        Some(data)
    }

    /// Read up to `max` samples without removing them.
    ///
    /// Returns samples and marks them as READ.
    pub fn read_batch(&self, max: usize) -> Vec<T> {
        let buffer = self.buffer.lock();
        let mut cursor = self.read_cursor.load(Ordering::Relaxed);
        let mut result = Vec::with_capacity(max.min(buffer.len()));
        let mut handles = Vec::with_capacity(max.min(buffer.len()));

        for _ in 0..max {
            if cursor >= buffer.len() {
                break;
            }

            let sample = &buffer[cursor];
            sample.mark_read();
            handles.push(sample.instance_handle);
            result.push(sample.data.clone());
            cursor += 1;
        }

        self.read_cursor.store(cursor, Ordering::Relaxed);
        drop(buffer);

        for handle in handles {
            self.mark_instance_observed(handle);
        }
        result
    }

    /// Read a single sample for a specific instance (DDS read_instance).
    ///
    /// Returns the first unread sample matching the given instance handle.
    /// Uses linear scan O(n) - acceptable for v1.0.
    ///
    /// Note: This only reads samples that haven't been read yet. After reading,
    /// the sample is marked as READ and won't be returned again by `read_instance`.
    ///
    /// # Arguments
    /// * `handle` - The instance handle to filter by
    ///
    /// # Returns
    /// * `Some(data)` if a matching unread sample was found
    /// * `None` if no matching unread sample exists
    pub fn read_instance(&self, handle: InstanceHandle) -> Option<T> {
        let buffer = self.buffer.lock();

        // Linear scan to find first unread matching instance
        for sample in buffer.iter() {
            if sample.instance_handle == handle && sample.sample_state() == SampleState::NotRead {
                sample.mark_read();
                let data = sample.data.clone();
                drop(buffer);
                self.mark_instance_observed(handle);
                return Some(data);
            }
        }

        None
    }

    /// Read up to `max` samples for a specific instance without removing them.
    ///
    /// Returns clones of unread samples matching the given instance handle.
    /// Uses linear scan O(n) - acceptable for v1.0.
    ///
    /// # Arguments
    /// * `handle` - The instance handle to filter by
    /// * `max` - Maximum number of samples to read
    pub fn read_instance_batch(&self, handle: InstanceHandle, max: usize) -> Vec<T> {
        let buffer = self.buffer.lock();
        let mut result = Vec::with_capacity(max);

        // Linear scan for unread samples matching instance
        for sample in buffer.iter() {
            if result.len() >= max {
                break;
            }

            if sample.instance_handle == handle && sample.sample_state() == SampleState::NotRead {
                sample.mark_read();
                result.push(sample.data.clone());
            }
        }
        drop(buffer);

        if !result.is_empty() {
            self.mark_instance_observed(handle);
        }
        result
    }
}
