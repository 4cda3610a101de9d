//! Error Types for Sensor Acquisition and Configuration
//!
//! ## Error Categories
//!
//! ### Sensor Failures
//! - `SensorError::Bus`: an I2C/ADC transaction failed.
//! - `SensorError::Unavailable`: the device did not answer at all.
//! - `SensorError::InvalidReading`: the driver returned NaN or infinity.
//!
//! Where a sensor error surfaces decides its fate, not its kind. During the
//! startup probe any of them is fatal: the process must not run with a dead
//! sensor. Once running, the owning pipeline logs the error, backs off and
//! retries, whatever the kind. It is never escalated to other tasks.
//!
//! ### Configuration Failures
//! - `ConfigError`: the configuration is inconsistent or unreadable. Always
//!   fatal at startup.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use vitalguard_core::{Channel, SensorError};
//!
//! fn on_read_failure(err: SensorError, starting_up: bool) -> Result<(), SensorError> {
//!     if starting_up {
//!         return Err(err);
//!     }
//!     log::warn!("{} read failed: {err}", err.channel());
//!     // back off, then retry on the same task
//!     Ok(())
//! }
//! # assert!(on_read_failure(SensorError::InvalidReading { channel: Channel::Pulse }, true).is_err());
//! # assert!(on_read_failure(SensorError::bus(Channel::Pulse, "nack"), false).is_ok());
//! ```

use crate::sample::Channel;
use thiserror::Error;

/// Result type for sensor reads
pub type SensorResult<T> = Result<T, SensorError>;

/// Failures reported by a [`SampleSource`](crate::traits::SampleSource)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Bus transaction failed (I2C NACK, ADC timeout, ...)
    #[error("{channel} bus error: {reason}")]
    Bus {
        /// Channel being read when the transaction failed
        channel: Channel,
        /// Driver supplied description
        reason: String,
    },

    /// Device did not respond at all
    #[error("{channel} sensor unavailable: {reason}")]
    Unavailable {
        /// Channel whose device is missing
        channel: Channel,
        /// Driver supplied description
        reason: String,
    },

    /// Value makes no physical sense (NaN, infinity)
    #[error("{channel} returned an invalid reading")]
    InvalidReading {
        /// Channel that produced the value
        channel: Channel,
    },
}

impl SensorError {
    /// Shorthand for a bus failure
    pub fn bus(channel: Channel, reason: impl Into<String>) -> Self {
        Self::Bus { channel, reason: reason.into() }
    }

    /// Channel the error relates to
    pub fn channel(&self) -> Channel {
        match self {
            Self::Bus { channel, .. }
            | Self::Unavailable { channel, .. }
            | Self::InvalidReading { channel } => *channel,
        }
    }
}

/// Failures driving an [`Actuator`](crate::traits::Actuator)
#[derive(Error, Debug, Clone, PartialEq)]
#[error("actuator failure: {reason}")]
pub struct ActuatorError {
    /// Driver supplied description
    pub reason: String,
}

/// Configuration errors, always fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value violates a constraint
    #[error("invalid configuration `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Configuration file could not be read
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for [`MonitorConfig`](crate::config::MonitorConfig)
    #[error("cannot parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}
