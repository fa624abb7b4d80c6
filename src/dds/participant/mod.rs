// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # DDS Participant
//!
//! The [`Participant`] is the entry point to the HDDS middleware. It represents
//! a single DDS domain participant and acts as a factory for all DDS entities.
//!
//! ## Overview
//!
//! A participant:
//! - Joins a DDS domain (isolated communication space)
//! - Creates publishers, subscribers, topics, readers, and writers
//! - Manages the lifecycle of all child entities
//!
//! ## Example
//!
//! ```rust,no_run
//! use hdds::{Participant, QoS, Result};
//!
//! fn main() -> Result<()> {
//!     let participant = Participant::builder("my_robot")
//!         .domain_id(0)
//!         .build()?;
//!
//!     let writer = participant.create_writer::<SensorData>(
//!         "sensors/lidar",
//!         QoS::reliable(),
//!     )?;
//!
//!     let reader = participant.create_reader::<Command>(
//!         "commands",
//!         QoS::reliable(),
//!     )?;
//!
//!     Ok(())
//! }
//! # #[derive(hdds::DDS)] struct SensorData { value: f64 }
//! # #[derive(hdds::DDS)] struct Command { id: u32 }
//! ```
//!
//! ## Transport Modes
//!
//! | Mode | Use Case |
//! |------|----------|
//! | [`TransportMode::IntraProcess`] | Same process, zero-copy auto-binding |
//! | [`TransportMode::External`] | Delegates send/receive to an external [`crate::dds::Transport`] |
//!
//! ## See Also
//!
//! - [`ParticipantBuilder`] - Builder pattern for configuration
//! - [`DataWriter`](crate::DataWriter) - Publish data samples
//! - [`DataReader`](crate::DataReader) - Subscribe to data samples
//! - [`QoS`](crate::QoS) - Quality of Service policies

mod builder;
mod runtime;

pub use builder::ParticipantBuilder;
pub use runtime::{Participant, TransportMode};
