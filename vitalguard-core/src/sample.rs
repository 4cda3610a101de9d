//! Raw samples as produced by a [`SampleSource`](crate::traits::SampleSource)
//!
//! A sample is immutable and consumed exactly once by the detector that owns
//! its channel:
//!
//! ```text
//! Pulse        ──→ PulseDetector
//! Conductance  ──→ StressClassifier
//! ObjectTemp   ─┬→ PresenceFilter
//! AmbientTemp  ─┘
//! ```

use crate::time::Timestamp;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Physical input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Channel {
    /// Pulse sensor voltage on the ADC
    Pulse = 0,
    /// Galvanic skin response on the ADC
    Conductance = 1,
    /// Infrared object temperature
    ObjectTemp = 2,
    /// Infrared sensor die (room) temperature
    AmbientTemp = 3,
}

impl Channel {
    /// Every channel, in probe order
    pub const ALL: [Channel; 4] = [
        Channel::Pulse,
        Channel::Conductance,
        Channel::ObjectTemp,
        Channel::AmbientTemp,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::Pulse => "pulse",
            Channel::Conductance => "conductance",
            Channel::ObjectTemp => "object_temp",
            Channel::AmbientTemp => "ambient_temp",
        }
    }

    /// Get expected unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            Channel::Pulse => "V",
            Channel::Conductance => "raw",
            Channel::ObjectTemp | Channel::AmbientTemp => "°C",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single timestamped reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub channel: Channel,
    pub value: f64,
    pub timestamp: Timestamp,
}

impl Sample {
    pub const fn new(channel: Channel, value: f64, timestamp: Timestamp) -> Self {
        Self { channel, value, timestamp }
    }

    pub const fn pulse(volts: f64, timestamp: Timestamp) -> Self {
        Self::new(Channel::Pulse, volts, timestamp)
    }

    pub const fn conductance(value: f64, timestamp: Timestamp) -> Self {
        Self::new(Channel::Conductance, value, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_and_units() {
        assert_eq!(Channel::Pulse.to_string(), "pulse");
        assert_eq!(Channel::ObjectTemp.unit(), "°C");
        assert_eq!(Channel::ALL.len(), 4);
    }
}
