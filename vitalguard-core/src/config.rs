//! Monitor configuration
//!
//! All thresholds and cadences live here with defaults from
//! [`constants`](crate::constants). Every field is optional in the JSON file;
//! missing fields keep their default.
//!
//! ```rust
//! use vitalguard_core::config::{MonitorConfig, StressConfig};
//!
//! let config = MonitorConfig::default()
//!     .with_stress(StressConfig::default().with_baseline(12_500.0));
//!
//! config.validate()?;
//! # Ok::<(), vitalguard_core::ConfigError>(())
//! ```

use crate::constants::*;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Heart rate detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// ADC input of the pulse sensor
    pub adc_channel: u8,
    /// Rising edge threshold (V)
    pub high_threshold_v: f64,
    /// Re-arm threshold (V)
    pub low_threshold_v: f64,
    /// Refractory period between counted beats (ms)
    pub min_interval_ms: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            adc_channel: PULSE_ADC_CHANNEL,
            high_threshold_v: PULSE_HIGH_THRESHOLD_V,
            low_threshold_v: PULSE_LOW_THRESHOLD_V,
            min_interval_ms: PULSE_MIN_INTERVAL_MS,
        }
    }
}

impl PulseConfig {
    /// Set both edge thresholds
    pub fn with_thresholds(mut self, low_v: f64, high_v: f64) -> Self {
        self.low_threshold_v = low_v;
        self.high_threshold_v = high_v;
        self
    }

    pub fn with_min_interval_ms(mut self, ms: u64) -> Self {
        self.min_interval_ms = ms;
        self
    }
}

/// Skin conductance classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub baseline: f64,
    pub relaxed_ratio: f64,
    pub normal_ratio: f64,
    pub elevated_ratio: f64,
    /// Raw readings at or above this mean no skin contact
    pub contact_threshold: f64,
    /// Sub-readings averaged into one sample
    pub sub_readings: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            baseline: GSR_BASELINE,
            relaxed_ratio: GSR_RELAXED_RATIO,
            normal_ratio: GSR_NORMAL_RATIO,
            elevated_ratio: GSR_ELEVATED_RATIO,
            contact_threshold: GSR_CONTACT_THRESHOLD,
            sub_readings: GSR_AVERAGE_COUNT,
        }
    }
}

impl StressConfig {
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_contact_threshold(mut self, threshold: f64) -> Self {
        self.contact_threshold = threshold;
        self
    }
}

/// Body temperature presence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub human_min_c: f64,
    pub human_max_c: f64,
    /// Starting margin over ambient (°C)
    pub baseline_offset_c: f64,
    /// Margin growth per widening (°C)
    pub offset_step_c: f64,
    /// Consecutive misses per widening
    pub max_attempts: u32,
    /// Object readings averaged per decision
    pub stable_readings: usize,
    /// Pause between averaged readings (ms)
    pub reading_spacing_ms: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            human_min_c: HUMAN_TEMP_MIN_C,
            human_max_c: HUMAN_TEMP_MAX_C,
            baseline_offset_c: AMBIENT_OFFSET_BASELINE_C,
            offset_step_c: AMBIENT_OFFSET_STEP_C,
            max_attempts: PRESENCE_MAX_ATTEMPTS,
            stable_readings: STABLE_TEMP_READINGS,
            reading_spacing_ms: STABLE_TEMP_SPACING_MS,
        }
    }
}

impl PresenceConfig {
    pub fn with_human_range(mut self, min_c: f64, max_c: f64) -> Self {
        self.human_min_c = min_c;
        self.human_max_c = max_c;
        self
    }

    pub fn with_stable_readings(mut self, readings: usize, spacing_ms: u64) -> Self {
        self.stable_readings = readings;
        self.reading_spacing_ms = spacing_ms;
        self
    }
}

/// Status classification and alert debounce settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub critical_bpm_low: f64,
    pub critical_bpm_high: f64,
    pub warning_bpm_low: f64,
    pub warning_bpm_high: f64,
    pub critical_temp_c: f64,
    pub warning_temp_c: f64,
    /// Consecutive ticks at one severity before alerting
    pub debounce_ticks: u32,
    /// Alert cap per non-Normal episode
    pub max_alerts_per_episode: u32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            critical_bpm_low: CRITICAL_BPM_LOW,
            critical_bpm_high: CRITICAL_BPM_HIGH,
            warning_bpm_low: WARNING_BPM_LOW,
            warning_bpm_high: WARNING_BPM_HIGH,
            critical_temp_c: CRITICAL_TEMP_C,
            warning_temp_c: WARNING_TEMP_C,
            debounce_ticks: ALERT_DEBOUNCE_TICKS,
            max_alerts_per_episode: MAX_ALERTS_PER_EPISODE,
        }
    }
}

impl StatusConfig {
    pub fn with_debounce(mut self, ticks: u32, max_alerts_per_episode: u32) -> Self {
        self.debounce_ticks = ticks;
        self.max_alerts_per_episode = max_alerts_per_episode;
        self
    }
}

/// Loop periods, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub pulse_ms: u64,
    pub stress_ms: u64,
    pub presence_ms: u64,
    pub aggregator_ms: u64,
    pub display_ms: u64,
    pub error_backoff_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            pulse_ms: PULSE_PERIOD_MS,
            stress_ms: STRESS_PERIOD_MS,
            presence_ms: PRESENCE_PERIOD_MS,
            aggregator_ms: AGGREGATOR_PERIOD_MS,
            display_ms: DISPLAY_PERIOD_MS,
            error_backoff_ms: SENSOR_ERROR_BACKOFF_MS,
        }
    }
}

impl CadenceConfig {
    /// Every period set to `ms`, handy for tests
    pub fn uniform(ms: u64) -> Self {
        Self {
            pulse_ms: ms,
            stress_ms: ms,
            presence_ms: ms,
            aggregator_ms: ms,
            display_ms: ms,
            error_backoff_ms: ms,
        }
    }

    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn stress(&self) -> Duration {
        Duration::from_millis(self.stress_ms)
    }

    pub fn presence(&self) -> Duration {
        Duration::from_millis(self.presence_ms)
    }

    pub fn aggregator(&self) -> Duration {
        Duration::from_millis(self.aggregator_ms)
    }

    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

/// Remote control surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub enabled: bool,
    pub bind: String,
    pub stream_interval_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: CONTROL_BIND_ADDR.to_string(),
            stream_interval_ms: STREAM_PERIOD_MS,
        }
    }
}

impl ControlConfig {
    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub pulse: PulseConfig,
    pub stress: StressConfig,
    pub presence: PresenceConfig,
    pub status: StatusConfig,
    pub cadence: CadenceConfig,
    pub control: ControlConfig,
}

impl MonitorConfig {
    /// Load from a JSON file, then validate
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_pulse(mut self, pulse: PulseConfig) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn with_stress(mut self, stress: StressConfig) -> Self {
        self.stress = stress;
        self
    }

    pub fn with_presence(mut self, presence: PresenceConfig) -> Self {
        self.presence = presence;
        self
    }

    pub fn with_status(mut self, status: StatusConfig) -> Self {
        self.status = status;
        self
    }

    pub fn with_cadence(mut self, cadence: CadenceConfig) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_control(mut self, control: ControlConfig) -> Self {
        self.control = control;
        self
    }

    /// Reject settings the detectors cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pulse;
        if !(p.low_threshold_v < p.high_threshold_v) {
            return Err(invalid("pulse.low_threshold_v", "must be below high_threshold_v"));
        }
        if p.min_interval_ms == 0 {
            return Err(invalid("pulse.min_interval_ms", "must be positive"));
        }

        let s = &self.stress;
        if !(s.baseline > 0.0) {
            return Err(invalid("stress.baseline", "must be positive"));
        }
        if !(s.relaxed_ratio < s.normal_ratio && s.normal_ratio < s.elevated_ratio) {
            return Err(invalid("stress.relaxed_ratio", "band ratios must be strictly increasing"));
        }
        if !(s.contact_threshold > 0.0) {
            return Err(invalid("stress.contact_threshold", "must be positive"));
        }
        if s.sub_readings == 0 {
            return Err(invalid("stress.sub_readings", "must be at least 1"));
        }

        let t = &self.presence;
        if !(t.human_min_c < t.human_max_c) {
            return Err(invalid("presence.human_min_c", "must be below human_max_c"));
        }
        if !t.baseline_offset_c.is_finite() {
            return Err(invalid("presence.baseline_offset_c", "must be a finite number"));
        }
        if !(t.offset_step_c >= 0.0 && t.offset_step_c.is_finite()) {
            return Err(invalid("presence.offset_step_c", "margin may only widen"));
        }
        if t.max_attempts == 0 {
            return Err(invalid("presence.max_attempts", "must be at least 1"));
        }
        if t.stable_readings == 0 {
            return Err(invalid("presence.stable_readings", "must be at least 1"));
        }

        let st = &self.status;
        if !(st.critical_bpm_low <= st.warning_bpm_low && st.warning_bpm_high <= st.critical_bpm_high) {
            return Err(invalid("status.warning_bpm_low", "warning band must sit inside the critical band"));
        }
        if !(st.warning_temp_c <= st.critical_temp_c) {
            return Err(invalid("status.warning_temp_c", "must not exceed critical_temp_c"));
        }
        if st.debounce_ticks == 0 {
            return Err(invalid("status.debounce_ticks", "must be at least 1"));
        }

        let c = &self.cadence;
        let periods = [
            ("cadence.pulse_ms", c.pulse_ms),
            ("cadence.stress_ms", c.stress_ms),
            ("cadence.presence_ms", c.presence_ms),
            ("cadence.aggregator_ms", c.aggregator_ms),
            ("cadence.display_ms", c.display_ms),
        ];
        for (field, ms) in periods {
            if ms == 0 {
                return Err(invalid(field, "must be positive"));
            }
        }

        if self.control.stream_interval_ms == 0 {
            return Err(invalid("control.stream_interval_ms", "must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_pulse_thresholds() {
        let config = MonitorConfig::default()
            .with_pulse(PulseConfig::default().with_thresholds(2.5, 1.5));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pulse.low_threshold_v", .. }));
    }

    #[test]
    fn rejects_zero_debounce() {
        let config = MonitorConfig::default()
            .with_status(StatusConfig::default().with_debounce(0, 5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_offset_step() {
        let mut config = MonitorConfig::default();
        config.presence.offset_step_c = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "presence.offset_step_c", .. }));

        config.presence.offset_step_c = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_contact_threshold() {
        for threshold in [0.0, -1.0, f64::NAN] {
            let config = MonitorConfig::default()
                .with_stress(StressConfig::default().with_contact_threshold(threshold));
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "stress.contact_threshold", .. }));
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stress": {{"baseline": 12000.0}}, "control": {{"bind": "127.0.0.1:9000"}}}}"#).unwrap();

        let config = MonitorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.stress.baseline, 12_000.0);
        assert_eq!(config.stress.contact_threshold, GSR_CONTACT_THRESHOLD);
        assert_eq!(config.control.bind, "127.0.0.1:9000");
        assert_eq!(config.pulse, PulseConfig::default());
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            MonitorConfig::from_json_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cadence": {{"pulse_ms": 0}}}}"#).unwrap();

        assert!(matches!(
            MonitorConfig::from_json_file(file.path()),
            Err(ConfigError::Invalid { field: "cadence.pulse_ms", .. })
        ));
    }
}
