// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # DDS Core API
//!
//! This module contains the primary DDS (Data Distribution Service) API for HDDS.
//!
//! ## Overview
//!
//! The DDS API provides a publish-subscribe middleware for real-time data distribution.
//! Key concepts:
//!
//! - **Participant**: Entry point to a DDS domain, factory for all entities
//! - **Topic**: Named data channel with an associated type
//! - **Publisher/Subscriber**: Intermediate grouping entities
//! - **DataWriter/DataReader**: Endpoints that send/receive typed data
//! - **QoS**: Quality of Service policies controlling behavior
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hdds::{Participant, QoS, TransportMode, DDS};
//!
//! struct SensorData { value: f64 }
//!
//! impl DDS for SensorData {
//!     fn type_name() -> &'static str { "SensorData" }
//!     fn to_serdata(&self) -> hdds::Result<hdds::core::serdata::Serdata> {
//!         unimplemented!("hand off to the external wire codec")
//!     }
//!     fn from_serdata(serdata: &hdds::core::serdata::Serdata) -> hdds::Result<Self> {
//!         unimplemented!("hand off to the external wire codec")
//!     }
//! }
//!
//! // Publisher (intra-process; pass TransportMode::External(transport) to
//! // reach other processes)
//! let pub_participant = Participant::builder("publisher")
//!     .domain_id(0)
//!     .build()?;
//! let writer = pub_participant.create_writer::<SensorData>("sensors", QoS::reliable())?;
//! writer.write(&SensorData { value: 42.0 })?;
//!
//! // Subscriber
//! let sub_participant = Participant::builder("subscriber")
//!     .domain_id(0)
//!     .build()?;
//! let reader = sub_participant.create_reader::<SensorData>("sensors", QoS::reliable())?;
//! if let Some(sample) = reader.try_take()? {
//!     println!("Got: {}", sample.value);
//! }
//! # Ok::<(), hdds::Error>(())
//! ```
//!
//! ## Entity Hierarchy
//!
//! ```text
//! DomainParticipant
//! +-- Publisher
//! |   +-- DataWriter<T>  ------> Topic<T>
//! +-- Subscriber
//!     +-- DataReader<T>  <------ Topic<T>
//! ```
//!
//! ## See Also
//!
//! - [`Participant`] - Start here
//! - [`QoS`] - Quality of Service configuration
//! - [`DDS`] - Trait for serializable types
//! - [DDS Specification](https://www.omg.org/spec/DDS/1.4/)

mod condition;
mod domain_registry;
/// Listener traits for callback-based notifications.
pub mod listener;
mod participant;
/// Prelude module for convenient imports.
pub mod prelude;
mod publisher;
/// QoS policy definitions and helpers for HDDS public API.
pub mod qos;
mod read_condition;
mod reader;
mod subscriber;
mod topic;
/// Transport seam: the interface the core consumes from the transport collaborator.
pub mod transport;
mod waitset;
mod writer;

pub use condition::{Condition, GuardCondition, HasStatusCondition, StatusCondition, StatusMask};
pub use participant::{Participant, ParticipantBuilder, TransportMode};
pub use publisher::Publisher;
pub use qos::{
    Deadline, DestinationOrder, DestinationOrderKind, Durability, DurabilityService, EntityFactory,
    GroupData, History, LatencyBudget, Lifespan, Liveliness, LivelinessKind, Ownership,
    OwnershipKind, OwnershipStrength, Partition, PolicyId, Presentation, PresentationAccessScope,
    QoS, ReaderDataLifecycle, Reliability, TimeBasedFilter, TopicData, TransportPriority,
    UserData, WriterDataLifecycle,
};
pub use read_condition::{
    InstanceStateMask, QueryCondition, ReadCondition, SampleStateMask, ViewStateMask,
};
pub use reader::DataReader;
pub use subscriber::Subscriber;
pub use topic::Topic;
pub use waitset::WaitSet;
pub use writer::DataWriter;

// Listener traits and status types
pub use listener::{
    ClosureListener, DataReaderListener, DataWriterListener, LivelinessChangedStatus,
    PublicationMatchedStatus, RequestedDeadlineMissedStatus, RequestedIncompatibleQosStatus,
    SampleLostStatus, SampleRejectedReason, SampleRejectedStatus, SubscriptionMatchedStatus,
};

// Intra-process auto-binding
pub use domain_registry::{BindToken, DomainRegistry, DomainState, EndpointKind, MatchKey, TypeId};

// Transport seam
pub use transport::{ReaderTransportSink, Transport, WriterTransportSink};

/// Errors returned by HDDS DDS operations.
///
/// This enum covers all error conditions that can occur during DDS operations,
/// from configuration issues to runtime failures.
///
/// # Example
///
/// ```rust,no_run
/// use hdds::{Participant, Error};
///
/// let result = Participant::builder("test")
///     .domain_id(999) // Invalid!
///     .build();
///
/// match result {
///     Err(Error::InvalidDomainId(id)) => println!("Bad domain: {}", id),
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => println!("Success"),
/// }
/// ```
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Configuration / QoS Errors
    // ========================================================================
    /// Generic configuration error (prefer specific variants below).
    Config,
    /// QoS policy is invalid (e.g., negative depth, conflicting policies).
    InvalidQos(String),
    /// Configuration file not found at specified path.
    ConfigFileNotFound(String),
    /// Attempted to change an immutable QoS policy after `enable()`.
    ImmutablePolicy(crate::dds::qos::PolicyId),
    /// Requested QoS is internally inconsistent (e.g. `KeepLast(0)`).
    InconsistentQos(crate::dds::qos::PolicyId),

    // ========================================================================
    // Entity Errors
    // ========================================================================
    /// Domain ID out of range (0-232).
    InvalidDomainId(u32),
    /// Participant ID out of range (0-119).
    InvalidParticipantId(u8),
    /// No available participant ID (all 120 ports occupied).
    NoAvailableParticipantId,
    /// Requested participant not found in domain.
    ParticipantNotFound,
    /// Topic registration failed.
    RegistrationFailed,
    /// Invalid state for the requested operation.
    InvalidState(String),
    /// Operation attempted on an entity already past `delete`.
    AlreadyDeleted,
    /// Entity has not been `enable()`d yet.
    NotEnabled,
    /// Operation not legal from the caller's current state (bad handle kind, post-close call).
    IllegalOperation(String),
    /// Required argument or precondition was not satisfied.
    PreconditionNotMet(String),
    /// No matching entity/sample found.
    NotFound(String),
    /// An argument failed validation (malformed name, bad QoS value shape).
    BadParameter(String),

    // ========================================================================
    // Transport Errors (surfaced from the external transport collaborator)
    // ========================================================================
    /// I/O error with underlying cause.
    IoError(std::io::Error),

    // ========================================================================
    // Data Errors
    // ========================================================================
    /// Type mismatch between writer and reader (different type names or incompatible schemas).
    TypeMismatch,
    /// QoS policies are incompatible between endpoints (e.g., reliable writer + best-effort reader).
    QosIncompatible,
    /// A value fell outside its accepted range.
    OutOfRange(String),

    // ========================================================================
    // Resource / Timing Errors
    // ========================================================================
    /// Operation would block but non-blocking mode requested (e.g., history cache full).
    WouldBlock,
    /// Resource limit exceeded (history depth, max_samples, etc.).
    ResourceLimitExceeded(String),
    /// Write operation timed out (reliable delivery backpressure, `wait`).
    Timeout,
    /// No sample available to return (`take`/`read` found nothing matching the mask).
    NoData,
    /// A blocking call was interrupted before its deadline.
    Interrupted,

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// Requested feature or operation is not supported.
    Unsupported,
    /// Generic error without a more specific variant.
    Other(String),
    /// Permission denied by access control (DDS Security).
    #[cfg(feature = "security")]
    PermissionDenied(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config => write!(f, "Configuration error"),
            Error::InvalidQos(msg) => write!(f, "Invalid QoS: {}", msg),
            Error::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            Error::ImmutablePolicy(id) => write!(f, "Immutable QoS policy changed: {:?}", id),
            Error::InconsistentQos(id) => write!(f, "Inconsistent QoS policy: {:?}", id),
            Error::InvalidDomainId(id) => write!(f, "Invalid domain_id: {} (must be 0-232)", id),
            Error::InvalidParticipantId(id) => {
                write!(f, "Invalid participant_id: {} (must be 0-119)", id)
            }
            Error::NoAvailableParticipantId => write!(
                f,
                "No available participant_id: all 120 slots in use for this domain"
            ),
            Error::ParticipantNotFound => write!(f, "Participant not found"),
            Error::RegistrationFailed => write!(f, "Topic registration failed"),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::AlreadyDeleted => write!(f, "Entity already deleted"),
            Error::NotEnabled => write!(f, "Entity not enabled"),
            Error::IllegalOperation(msg) => write!(f, "Illegal operation: {}", msg),
            Error::PreconditionNotMet(msg) => write!(f, "Precondition not met: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::BadParameter(msg) => write!(f, "Bad parameter: {}", msg),
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::TypeMismatch => write!(f, "Type mismatch"),
            Error::QosIncompatible => write!(f, "QoS incompatible"),
            Error::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            Error::WouldBlock => write!(f, "Operation would block"),
            Error::ResourceLimitExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::NoData => write!(f, "No data available"),
            Error::Interrupted => write!(f, "Operation interrupted"),
            Error::Unsupported => write!(f, "Unsupported operation"),
            Error::Other(msg) => write!(f, "{}", msg),
            #[cfg(feature = "security")]
            Error::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract a user type implements to flow through writers/readers.
///
/// The core never serializes or introspects application data itself: it
/// consumes a type's [`core::serdata::Serdata`] (opaque bytes plus key hash
/// and timestamp metadata) produced by an external codec. This trait is the
/// seam between that codec and the core — implement it by handing the core
/// pre-serialized bytes and a key hash, not by encoding here.
pub trait DDS: Sized + Send + Sync + 'static {
    /// Type name used for topic/type matching (spec §4.2 rule 1).
    fn type_name() -> &'static str;

    /// Wrap `self` into an opaque [`core::serdata::Serdata`] for the WHC.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the external codec fails to serialize the value.
    fn to_serdata(&self) -> Result<crate::core::serdata::Serdata>;

    /// Recover a typed value from a [`core::serdata::Serdata`] payload.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the payload cannot be decoded as `Self`.
    fn from_serdata(serdata: &crate::core::serdata::Serdata) -> Result<Self>;

    /// Compute the 16-byte instance key hash from `@key` fields.
    ///
    /// # Default Implementation
    ///
    /// Returns a zeroed hash. Types with `@key` fields must override this;
    /// keyless types correctly share the single zero-key instance.
    fn compute_key(&self) -> [u8; 16] {
        [0u8; 16]
    }

    /// Returns true if this type has `@key` fields.
    #[must_use]
    fn has_key() -> bool {
        false
    }
}
