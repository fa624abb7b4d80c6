// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds - Data Distribution Service middleware core
//!
//! A pure Rust implementation of the core engineering of the OMG DDS (Data
//! Distribution Service) and RTPS (Real-Time Publish-Subscribe) specifications:
//! history caches, QoS matching, and the reliable-delivery state machine.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hdds::{Participant, QoS, Result, DdsTrait};
//!
//! struct MyData { value: f64 }
//!
//! impl DdsTrait for MyData {
//!     fn type_name() -> &'static str { "MyData" }
//!     fn to_serdata(&self) -> Result<hdds::core::serdata::Serdata> {
//!         unimplemented!("hand off to the external wire codec")
//!     }
//!     fn from_serdata(serdata: &hdds::core::serdata::Serdata) -> Result<Self> {
//!         unimplemented!("hand off to the external wire codec")
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let participant = Participant::builder("my_app")
//!         .domain_id(0)
//!         .build()?;
//!
//!     let writer = participant.create_writer::<MyData>("sensors/temperature", QoS::default())?;
//!     writer.write(&MyData { value: 42.0 })?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                         Application Layer                          |
//! |   Participant -> Publisher/Subscriber -> DataWriter/DataReader     |
//! +---------------------------------------------------------------------+
//! |                           DDS Layer                                 |
//! |   QoS Policies | Topic Management | Instance Lifecycle | WaitSets  |
//! +---------------------------------------------------------------------+
//! |                          RTPS Layer                                 |
//! |   Endpoint matcher | WHC/RHC | Reliable-delivery state machine      |
//! +---------------------------------------------------------------------+
//! |         External collaborators (out of scope for this crate)        |
//! |   Wire codec (Serdata) | Transport | Security | Config loader       |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Participant`] | Entry point to the DDS domain, factory for all entities |
//! | [`DataWriter`] | Publishes typed data samples to a topic |
//! | [`DataReader`] | Subscribes to typed data samples from a topic |
//! | [`Topic`] | Named data channel with associated type and `QoS` |
//! | [`QoS`] | Quality of Service policies (reliability, durability, etc.) |
//!
//! ## Features
//!
//! - Reliable and best-effort delivery with NACK-driven retransmission
//! - Writer/reader history caches with resource-limit enforcement
//! - Full QoS compatibility matching (RxO) across all standard policies
//! - Discovery-driven endpoint matching
//! - `WaitSet`/`Condition` event-driven blocking
//!
//! ## Modules Overview
//!
//! - [`dds`] - Core DDS API (start here)
//! - [`qos`] - Quality of Service policies
//! - [`reliability`] - RTPS reliable-delivery protocol and history cache
//! - [`core`] - Entity registry, discovery matcher, serdata, instance map
//!
//! ## See Also
//!
//! - [DDS Specification](https://www.omg.org/spec/DDS/1.4/)
//! - [RTPS Specification](https://www.omg.org/spec/DDSI-RTPS/2.5/)

// Clippy: No blanket suppressions. Fix issues properly or use inline #[allow] with justification.

// Allow the derive macro to work inside this crate's tests
extern crate self as hdds;

/// Global configuration (RTPS constants used by the core, runtime config).
pub mod config;
/// Core RTPS protocol implementation (discovery, entity registry, matcher).
pub mod core;
/// Core DDS API (Participant, DataReader, DataWriter, Publisher, Subscriber).
pub mod dds;
/// Compile-time configurable logging system (zero-cost when disabled).
pub mod logging;
/// `QoS` (Quality of Service) policies for DDS entities.
pub mod qos;
/// Reliability QoS implementation (Reliable protocol, RTPS messages, history cache).
pub mod reliability;
/// Tagged-field metric snapshots shared by the reliability and DDS layers.
pub mod telemetry;

pub use dds::{
    Condition, DataReader, DataWriter, Error, GuardCondition, HasStatusCondition, Participant,
    QoS, ReaderTransportSink, Result, Topic, Transport, TransportMode, WaitSet,
    WriterTransportSink,
};

// Re-export DDS trait (application types implement this directly; no codegen)
pub use dds::DDS as DdsTrait;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
