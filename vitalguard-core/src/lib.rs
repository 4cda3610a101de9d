//! Signal fusion and status engine for VitalGuard
//!
//! Turns noisy pulse, skin conductance and infrared temperature readings into
//! a three-level clinical status with debounced alerting.
//!
//! Everything here is synchronous and clock-free: detectors are step functions
//! taking an explicit millisecond [`Timestamp`], so they can be driven by a
//! sampling task in production and by plain loops in tests.
//!
//! ```text
//! SampleSource ─┬─ PulseDetector ─────┐
//!               ├─ StressClassifier ──┼─→ SharedSnapshot ←─ StatusAggregator ─→ AlertRequest
//!               └─ PresenceFilter ────┘                            │
//!                                                          IndicatorPattern
//! ```
//!
//! ```
//! use vitalguard_core::{StatusAggregator, StatusInputs, StatusLevel};
//!
//! let mut aggregator = StatusAggregator::default();
//! let inputs = StatusInputs {
//!     bpm: Some(130.0),
//!     stress: None,
//!     temperature: 36.6,
//!     human_present: true,
//! };
//!
//! let update = aggregator.evaluate(&inputs);
//! assert_eq!(update.level, StatusLevel::Critical);
//! // Alerts need sustained abnormality
//! assert!(update.alert.is_none());
//! ```

#![deny(unsafe_code)]

pub mod alert;
pub mod config;
pub mod constants;
pub mod errors;
pub mod presence;
pub mod pulse;
pub mod sample;
pub mod snapshot;
pub mod status;
pub mod stress;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use alert::AlertMessage;
pub use config::{
    CadenceConfig, ControlConfig, MonitorConfig, PresenceConfig, PulseConfig, StatusConfig,
    StressConfig,
};
pub use errors::{ActuatorError, ConfigError, SensorError, SensorResult};
pub use presence::{PresenceFilter, PresenceReading, PresenceState};
pub use pulse::{Beat, PulseDetector, PulseEvent, PulseState};
pub use sample::{Channel, Sample};
pub use snapshot::{SharedSnapshot, Snapshot};
pub use status::{
    AggregatorState, AlertRequest, IndicatorPattern, StatusAggregator, StatusInputs, StatusLevel,
    StatusUpdate,
};
pub use stress::{StressClassifier, StressLabel, StressReading};
pub use time::{MonotonicTime, TimeSource, Timestamp};
pub use traits::{Actuator, DisplayFrame, DisplaySink, SampleSource};
pub use window::SmoothingWindow;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
