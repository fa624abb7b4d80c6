// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque serialized-sample carrier.
//!
//! `Serdata` is what the WHC and RHC actually store and move around. The
//! core never looks inside `payload` — serialization is an external
//! collaborator's job (the wire codec). What the core needs from a sample
//! is its kind, its instance key hash, its timestamp, and the
//! unregister/dispose bits, all of which travel alongside the opaque bytes.

use std::sync::Arc;

/// Whether a `Serdata` carries a full sample or only a key (for
/// dispose/unregister notifications).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerdataKind {
    /// Full sample payload present.
    Data,
    /// Key fields only; `payload` is `None`.
    Key,
}

bitflags::bitflags! {
    /// Status-info bits carried alongside a sample (RTPS `StatusInfo_t`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusInfo: u32 {
        /// Instance was disposed by its writer.
        const DISPOSED = 0b0000_0001;
        /// Instance was unregistered by its writer.
        const UNREGISTERED = 0b0000_0010;
    }
}

/// Reference-counted, immutable serialized-sample carrier.
///
/// Shared between a writer's WHC entry and any number of matched readers'
/// RHC slots via `Arc` clone — cheap to pass around, never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct Serdata {
    inner: Arc<SerdataInner>,
}

#[derive(Debug)]
struct SerdataInner {
    kind: SerdataKind,
    key_hash: u128,
    source_timestamp_ns: i64,
    status_info: StatusInfo,
    payload: Option<Arc<[u8]>>,
}

impl Serdata {
    /// Construct a full-data sample.
    #[must_use]
    pub fn new_data(key_hash: u128, source_timestamp_ns: i64, payload: Arc<[u8]>) -> Self {
        Self {
            inner: Arc::new(SerdataInner {
                kind: SerdataKind::Data,
                key_hash,
                source_timestamp_ns,
                status_info: StatusInfo::empty(),
                payload: Some(payload),
            }),
        }
    }

    /// Construct a key-only sample carrying dispose/unregister bits.
    #[must_use]
    pub fn new_key_only(
        key_hash: u128,
        source_timestamp_ns: i64,
        status_info: StatusInfo,
    ) -> Self {
        Self {
            inner: Arc::new(SerdataInner {
                kind: SerdataKind::Key,
                key_hash,
                source_timestamp_ns,
                status_info,
                payload: None,
            }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SerdataKind {
        self.inner.kind
    }

    #[must_use]
    pub fn key_hash(&self) -> u128 {
        self.inner.key_hash
    }

    #[must_use]
    pub fn source_timestamp_ns(&self) -> i64 {
        self.inner.source_timestamp_ns
    }

    #[must_use]
    pub fn status_info(&self) -> StatusInfo {
        self.inner.status_info
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.status_info.contains(StatusInfo::DISPOSED)
    }

    #[must_use]
    pub fn is_unregistered(&self) -> bool {
        self.inner.status_info.contains(StatusInfo::UNREGISTERED)
    }

    /// Opaque payload bytes, `None` for key-only samples.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.inner.payload.as_deref()
    }

    /// Approximate byte size used for WHC/RHC resource accounting.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.inner.payload.as_ref().map_or(0, |p| p.len())
    }
}
