//! Human presence from infrared body temperature
//!
//! An infrared thermometer reads whatever is in front of it. A reading counts
//! as a human body iff it is
//! - inside the plausible skin range (35.8–40.0 °C by default), **and**
//! - warmer than `ambient + ambient_offset`.
//!
//! The second condition rejects warm rooms and warm objects that happen to sit
//! in the body range. After `max_attempts` consecutive misses the offset grows
//! by `offset_step_c`, tightening detection as ambient air slowly warms. The
//! offset never shrinks.
//!
//! Without a detection the reported temperature is `0.0`, meaning "no current
//! reading", not a literal freezing temperature.

use crate::config::PresenceConfig;
use serde::{Deserialize, Serialize};

/// Filter state, owned by the presence pipeline alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceState {
    pub last_object_temp: Option<f64>,
    /// Margin over ambient, monotonic non-decreasing
    pub ambient_offset: f64,
    pub consecutive_misses: u32,
}

/// Outcome of one presence decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenceReading {
    pub human_present: bool,
    /// Body temperature, `0.0` without a detection
    pub temperature: f64,
    pub dynamic_threshold: f64,
    /// `true` if this decision widened the ambient margin
    pub offset_widened: bool,
}

/// Adaptive body temperature presence filter
#[derive(Debug, Clone)]
pub struct PresenceFilter {
    config: PresenceConfig,
    state: PresenceState,
}

impl PresenceFilter {
    pub fn new(config: PresenceConfig) -> Self {
        let state = PresenceState {
            last_object_temp: None,
            ambient_offset: config.baseline_offset_c,
            consecutive_misses: 0,
        };
        Self { config, state }
    }

    /// Decide presence from a stable object temperature and the ambient reading
    pub fn step(&mut self, object_temp: f64, ambient_temp: f64) -> PresenceReading {
        let dynamic_threshold = ambient_temp + self.state.ambient_offset;
        self.state.last_object_temp = Some(object_temp);

        let in_range = object_temp >= self.config.human_min_c && object_temp <= self.config.human_max_c;
        if in_range && object_temp > dynamic_threshold {
            self.state.consecutive_misses = 0;
            log::debug!("body temperature {object_temp:.2}°C (threshold {dynamic_threshold:.2}°C)");
            return PresenceReading {
                human_present: true,
                temperature: object_temp,
                dynamic_threshold,
                offset_widened: false,
            };
        }

        self.state.consecutive_misses += 1;
        let mut offset_widened = false;
        if self.state.consecutive_misses >= self.config.max_attempts {
            self.state.ambient_offset += self.config.offset_step_c;
            self.state.consecutive_misses = 0;
            offset_widened = true;
            log::debug!("ambient margin widened to {:.2}°C", self.state.ambient_offset);
        }

        log::trace!("no body at {object_temp:.2}°C (ambient {ambient_temp:.2}°C)");
        PresenceReading {
            human_present: false,
            temperature: 0.0,
            dynamic_threshold,
            offset_widened,
        }
    }

    pub fn state(&self) -> &PresenceState {
        &self.state
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }
}

impl Default for PresenceFilter {
    fn default() -> Self {
        Self::new(PresenceConfig::default())
    }
}

/// Mean of repeated raw object readings
///
/// Cheap low-pass: the sensor is sampled N times in a burst instead of keeping
/// history between decisions. Non-finite readings are skipped.
pub fn stable_temperature<I>(readings: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = readings
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
