//! Collaborator interfaces
//!
//! The engine never touches a bus, a GPIO pin or a pixel. Hardware lives
//! behind these traits; tests swap in deterministic fakes.

use crate::errors::{ActuatorError, SensorResult};
use crate::sample::Channel;
use crate::snapshot::Snapshot;
use crate::status::{IndicatorPattern, StatusLevel};

/// Raw sensor acquisition
///
/// Each read may block briefly (an I2C transaction), so callers run them off
/// the async executor. Implementations hold no detection logic.
pub trait SampleSource: Send + Sync {
    /// Voltage on an ADC input (V)
    fn read_voltage(&self, adc_channel: u8) -> SensorResult<f64>;

    /// Skin conductance (raw ADC units)
    fn read_conductance(&self) -> SensorResult<f64>;

    /// Infrared object temperature (°C)
    fn read_object_temp(&self) -> SensorResult<f64>;

    /// Sensor die / ambient temperature (°C)
    fn read_ambient_temp(&self) -> SensorResult<f64>;

    /// Check that a channel is wired and answering
    ///
    /// Called once per channel at startup. The default performs one read.
    fn probe(&self, channel: Channel, adc_channel: u8) -> SensorResult<()> {
        match channel {
            Channel::Pulse => self.read_voltage(adc_channel).map(drop),
            Channel::Conductance => self.read_conductance().map(drop),
            Channel::ObjectTemp => self.read_object_temp().map(drop),
            Channel::AmbientTemp => self.read_ambient_temp().map(drop),
        }
    }
}

/// Indicator lights and buzzer
pub trait Actuator: Send {
    fn apply(&mut self, pattern: IndicatorPattern) -> Result<(), ActuatorError>;

    fn set_indicator(&mut self, level: StatusLevel, presence: bool) -> Result<(), ActuatorError> {
        self.apply(IndicatorPattern::for_status(level, presence))
    }

    /// Drive everything off
    fn safe_state(&mut self) -> Result<(), ActuatorError> {
        self.apply(IndicatorPattern::OFF)
    }
}

/// What the display task hands to a [`DisplaySink`]
#[derive(Debug, Clone, Copy)]
pub struct DisplayFrame<'a> {
    pub snapshot: Snapshot,
    /// Oldest first
    pub bpm_history: &'a [f64],
    /// A new alert went out since the previous frame
    pub alert_sent: bool,
}

/// Small status display
pub trait DisplaySink: Send {
    fn render(&mut self, frame: &DisplayFrame<'_>);
}
