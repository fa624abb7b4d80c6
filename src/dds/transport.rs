// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport seam: the interface the core consumes from the external
//! transport collaborator (spec.md §1).
//!
//! The core never opens a socket, builds an RTPS message, or fragments a
//! payload. It hands a [`Transport`] implementation a `GUID` plus whatever
//! already-encoded piece it needs to move (a [`Serdata`], a heartbeat, a
//! nack, a gap) and the transport decides how to get it to the wire. On the
//! receive side the transport calls back into a registered
//! [`WriterTransportSink`]/[`ReaderTransportSink`] with the decoded
//! submessage; the core never parses bytes off the network itself.

use std::sync::Arc;

use crate::core::discovery::GUID;
use crate::core::serdata::Serdata;
use crate::dds::Result;
use crate::reliability::messages::{GapMsg, HeartbeatMsg, NackMsg};

/// Callbacks a writer registers with the transport to receive ACKNACK/NACK
/// submessages addressed to it.
pub trait WriterTransportSink: Send + Sync {
    /// A reader sent a NACK (ACKNACK with a non-empty missing-set) for this
    /// writer's GUID.
    fn on_nack(&self, remote_reader: GUID, nack: &NackMsg);
}

/// Callbacks a reader registers with the transport to receive DATA,
/// HEARTBEAT and GAP submessages addressed to it.
pub trait ReaderTransportSink: Send + Sync {
    /// A sample arrived from `remote_writer` at sequence number `seq`.
    fn on_data(&self, remote_writer: GUID, seq: u64, serdata: &Serdata);
    /// A HEARTBEAT arrived from `remote_writer`.
    fn on_heartbeat(&self, remote_writer: GUID, heartbeat: &HeartbeatMsg);
    /// A GAP arrived from `remote_writer`.
    fn on_gap(&self, remote_writer: GUID, gap: &GapMsg);
}

/// The external transport collaborator's interface, as consumed by the
/// core's writer/reader runtimes.
///
/// Implementations own the actual sockets, wire encoding and fragmentation;
/// none of that is this crate's concern. A `Transport` is shared (`Arc`)
/// across every entity in a participant that isn't using the intra-process
/// fast path.
pub trait Transport: Send + Sync {
    /// The local participant's GUID prefix, used to build entity GUIDs.
    fn local_guid_prefix(&self) -> [u8; 12];

    /// Send a data sample originating from `writer` at `seq`.
    fn send_data(&self, writer: GUID, seq: u64, serdata: &Serdata) -> Result<()>;

    /// Send a heartbeat for `writer`.
    fn send_heartbeat(&self, writer: GUID, heartbeat: &HeartbeatMsg) -> Result<()>;

    /// Send a NACK (ACKNACK) from `reader`.
    fn send_nack(&self, reader: GUID, nack: &NackMsg) -> Result<()>;

    /// Send a GAP for `writer`.
    fn send_gap(&self, writer: GUID, gap: &GapMsg) -> Result<()>;

    /// Register a writer's callback sink so incoming NACKs reach it.
    fn register_writer(&self, guid: GUID, sink: Arc<dyn WriterTransportSink>);

    /// Register a reader's callback sink so incoming DATA/HEARTBEAT/GAP
    /// reach it.
    fn register_reader(&self, guid: GUID, sink: Arc<dyn ReaderTransportSink>);

    /// Undo a previous `register_writer`.
    fn unregister_writer(&self, guid: GUID);

    /// Undo a previous `register_reader`.
    fn unregister_reader(&self, guid: GUID);
}
