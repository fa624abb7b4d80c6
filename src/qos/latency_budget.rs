// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! LATENCY_BUDGET QoS policy (DDS v1.4 Sec.2.2.3.15)
//!
//! Provides a hint to the DDS implementation about the desired maximum delay
//! from the time data is written to when it's received.
//!
//! # QoS Compatibility (Request vs Offered)
//!
//! **Rule:** `writer.duration <= reader.duration` (RxO)
//!
//! The writer must offer a budget at least as tight as what the reader asks
//! for. Durations are hints to the transport layer, not hard guarantees, but
//! the compatibility check itself is enforced like any other RxO policy.
//!
//! # Use Cases
//!
//! - **Low-latency critical data**:
//!   - Control commands (require fast response)
//!   - Emergency alerts (immediate delivery)
//!   - Real-time sensor data (minimize staleness)
//!
//! - **Non-critical data**:
//!   - Logs (no specific latency requirement)
//!   - Diagnostics (can tolerate delay)
//!   - Historical data (latency irrelevant)
//!
//! # Examples
//!
//! ```no_run
//! use hdds::qos::latency_budget::LatencyBudget;
//! use std::time::Duration;
//!
//! // Critical data: 10ms latency budget
//! let critical = LatencyBudget::new(Duration::from_millis(10));
//! assert_eq!(critical.duration, Duration::from_millis(10));
//!
//! // No specific latency requirement (default)
//! let default = LatencyBudget::zero();
//! assert_eq!(default.duration, Duration::ZERO);
//! ```

use std::time::Duration;

/// LATENCY_BUDGET QoS policy
///
/// Specifies the maximum acceptable delay from write to receive.
/// This is a hint to the DDS implementation for transport optimization.
///
/// Default: Zero (no specific latency requirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyBudget {
    /// Maximum acceptable delay from write to receive
    pub duration: Duration,
}

impl Default for LatencyBudget {
    /// Default: Zero duration (no specific latency requirement)
    fn default() -> Self {
        Self::zero()
    }
}

impl LatencyBudget {
    /// Create new LATENCY_BUDGET policy with specified duration
    ///
    /// # Arguments
    ///
    /// * `duration` - Maximum acceptable delay
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::latency_budget::LatencyBudget;
    /// use std::time::Duration;
    ///
    /// // 10ms latency budget for critical control data
    /// let budget = LatencyBudget::new(Duration::from_millis(10));
    /// assert_eq!(budget.duration, Duration::from_millis(10));
    /// ```
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Create LATENCY_BUDGET with zero duration (no specific requirement)
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::latency_budget::LatencyBudget;
    /// use std::time::Duration;
    ///
    /// let budget = LatencyBudget::zero();
    /// assert_eq!(budget.duration, Duration::ZERO);
    /// assert!(budget.is_zero());
    /// ```
    pub fn zero() -> Self {
        Self {
            duration: Duration::ZERO,
        }
    }

    /// Check if latency budget is zero (no specific requirement)
    pub fn is_zero(&self) -> bool {
        self.duration == Duration::ZERO
    }

    /// Check if latency budget is set (non-zero)
    pub fn is_set(&self) -> bool {
        self.duration > Duration::ZERO
    }

    /// Check QoS compatibility between offered (writer) and requested (reader).
    ///
    /// **Rule:** `writer.duration <= reader.duration` (RxO) — the writer must offer
    /// a budget at least as tight as what the reader asks for.
    #[must_use]
    pub fn is_compatible_with(&self, requested: &LatencyBudget) -> bool {
        self.duration <= requested.duration
    }

    /// Create latency budget from milliseconds
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::latency_budget::LatencyBudget;
    ///
    /// let budget = LatencyBudget::from_millis(50);
    /// assert_eq!(budget.duration.as_millis(), 50);
    /// ```
    pub fn from_millis(ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(ms),
        }
    }

    /// Create latency budget from seconds
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::latency_budget::LatencyBudget;
    ///
    /// let budget = LatencyBudget::from_secs(2);
    /// assert_eq!(budget.duration.as_secs(), 2);
    /// ```
    pub fn from_secs(secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(secs),
        }
    }
}
