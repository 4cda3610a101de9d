//! Status Aggregation with Alert Debounce
//!
//! ## Overview
//!
//! The aggregator fuses the latest heart rate, stress label and body
//! temperature into one of three severities, once per tick:
//!
//! | Level    | Any of                                                        |
//! |----------|---------------------------------------------------------------|
//! | Critical | bpm < 50, bpm > 120, stress High, temperature > 39.0 °C       |
//! | Warning  | bpm in [50, 60) or (100, 120], stress Elevated, temp > 37.8 °C|
//! | Normal   | otherwise                                                     |
//!
//! Without a subject present the status is forced to Normal and no alert
//! logic runs.
//!
//! ## Debounce
//!
//! Raw sensor noise produces single-tick excursions. An alert is only
//! dispatched after `debounce_ticks` **consecutive** ticks at the same
//! severity, and at most `max_alerts_per_episode` times per episode:
//!
//! ```text
//! tick:    1  2  3  4  5  6  7  8  9  10 11
//! level:   C  C  C  C  C  C  C  C  C  C  N
//! counter: 1  2  3  4  5→0 1  2  3  4  5→0 0
//!                      ↑ alert         ↑ alert   episode ends, budget reset
//! ```
//!
//! The counters for Warning and Critical are mutually exclusive: a tick at one
//! severity zeroes the other.
//!
//! A heart rate of `None` (fewer than two beats so far) does not take part in
//! the bpm criteria.

use crate::config::StatusConfig;
use crate::stress::StressLabel;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Clinical status, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum StatusLevel {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl StatusLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "Normal",
            StatusLevel::Warning => "Warning",
            StatusLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest derived signals, one aggregator input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusInputs {
    pub bpm: Option<f64>,
    pub stress: Option<StressLabel>,
    /// Body temperature, `0.0` when unknown
    pub temperature: f64,
    pub human_present: bool,
}

/// Request handed to the alert dispatcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertRequest {
    pub level: StatusLevel,
    pub bpm: Option<f64>,
    pub temperature: f64,
    pub stress: Option<StressLabel>,
    /// 1-based position of this alert within its episode
    pub sequence: u32,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusUpdate {
    pub level: StatusLevel,
    pub previous: StatusLevel,
    pub alert: Option<AlertRequest>,
}

impl StatusUpdate {
    pub fn changed(&self) -> bool {
        self.level != self.previous
    }
}

/// Hysteresis counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorState {
    pub status: StatusLevel,
    pub consecutive_warning_with_presence: u32,
    pub consecutive_critical_with_presence: u32,
    pub alerts_sent_in_episode: u32,
}

/// Debounced status state machine
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    config: StatusConfig,
    state: AggregatorState,
}

impl StatusAggregator {
    pub fn new(config: StatusConfig) -> Self {
        Self { config, state: AggregatorState::default() }
    }

    /// Severity for the given inputs, ignoring presence and history
    pub fn classify(&self, inputs: &StatusInputs) -> StatusLevel {
        let c = &self.config;
        let bpm = inputs.bpm.filter(|b| b.is_finite());

        let critical = bpm.is_some_and(|b| b < c.critical_bpm_low || b > c.critical_bpm_high)
            || inputs.stress == Some(StressLabel::High)
            || inputs.temperature > c.critical_temp_c;
        if critical {
            return StatusLevel::Critical;
        }

        let warning = bpm.is_some_and(|b| b < c.warning_bpm_low || b > c.warning_bpm_high)
            || inputs.stress == Some(StressLabel::Elevated)
            || inputs.temperature > c.warning_temp_c;
        if warning {
            return StatusLevel::Warning;
        }

        StatusLevel::Normal
    }

    /// Run one tick
    pub fn evaluate(&mut self, inputs: &StatusInputs) -> StatusUpdate {
        let previous = self.state.status;
        let level = if inputs.human_present {
            self.classify(inputs)
        } else {
            StatusLevel::Normal
        };
        self.state.status = level;

        let counter = match level {
            StatusLevel::Normal => {
                self.state.consecutive_warning_with_presence = 0;
                self.state.consecutive_critical_with_presence = 0;
                self.state.alerts_sent_in_episode = 0;
                None
            }
            StatusLevel::Warning => {
                self.state.consecutive_critical_with_presence = 0;
                self.state.consecutive_warning_with_presence += 1;
                Some(&mut self.state.consecutive_warning_with_presence)
            }
            StatusLevel::Critical => {
                self.state.consecutive_warning_with_presence = 0;
                self.state.consecutive_critical_with_presence += 1;
                Some(&mut self.state.consecutive_critical_with_presence)
            }
        };

        let mut alert = None;
        if let Some(counter) = counter {
            if *counter >= self.config.debounce_ticks
                && self.state.alerts_sent_in_episode < self.config.max_alerts_per_episode
            {
                *counter = 0;
                self.state.alerts_sent_in_episode += 1;
                alert = Some(AlertRequest {
                    level,
                    bpm: inputs.bpm,
                    temperature: inputs.temperature,
                    stress: inputs.stress,
                    sequence: self.state.alerts_sent_in_episode,
                });
            }
        }

        if level != previous {
            log::info!("status {previous} -> {level}");
        }

        StatusUpdate { level, previous, alert }
    }

    pub fn state(&self) -> &AggregatorState {
        &self.state
    }

    pub fn status(&self) -> StatusLevel {
        self.state.status
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }
}

impl Default for StatusAggregator {
    fn default() -> Self {
        Self::new(StatusConfig::default())
    }
}

/// Indicator lights and buzzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorPattern {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
    pub buzzer: bool,
}

impl IndicatorPattern {
    /// Everything off, the safe state
    pub const OFF: Self = Self { green: false, yellow: false, red: false, buzzer: false };

    /// Lights for a status
    ///
    /// The buzzer only sounds for Critical with a subject present; Critical
    /// without presence (which the aggregator never produces) is all off.
    pub const fn for_status(level: StatusLevel, presence: bool) -> Self {
        match (level, presence) {
            (StatusLevel::Normal, _) => Self { green: true, ..Self::OFF },
            (StatusLevel::Warning, _) => Self { yellow: true, ..Self::OFF },
            (StatusLevel::Critical, true) => Self { red: true, buzzer: true, ..Self::OFF },
            (StatusLevel::Critical, false) => Self::OFF,
        }
    }

    pub const fn is_off(&self) -> bool {
        !(self.green || self.yellow || self.red || self.buzzer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(bpm: f64) -> StatusInputs {
        StatusInputs {
            bpm: Some(bpm),
            stress: Some(StressLabel::Normal),
            temperature: 36.6,
            human_present: true,
        }
    }

    #[test]
    fn classification_table() {
        let agg = StatusAggregator::default();

        assert_eq!(agg.classify(&present(75.0)), StatusLevel::Normal);
        assert_eq!(agg.classify(&present(60.0)), StatusLevel::Normal);
        assert_eq!(agg.classify(&present(100.0)), StatusLevel::Normal);
        assert_eq!(agg.classify(&present(59.9)), StatusLevel::Warning);
        assert_eq!(agg.classify(&present(50.0)), StatusLevel::Warning);
        assert_eq!(agg.classify(&present(100.1)), StatusLevel::Warning);
        assert_eq!(agg.classify(&present(120.0)), StatusLevel::Warning);
        assert_eq!(agg.classify(&present(49.9)), StatusLevel::Critical);
        assert_eq!(agg.classify(&present(120.1)), StatusLevel::Critical);

        let hot = StatusInputs { temperature: 39.2, ..present(75.0) };
        assert_eq!(agg.classify(&hot), StatusLevel::Critical);
        let warm = StatusInputs { temperature: 38.0, ..present(75.0) };
        assert_eq!(agg.classify(&warm), StatusLevel::Warning);

        let stressed = StatusInputs { stress: Some(StressLabel::High), ..present(75.0) };
        assert_eq!(agg.classify(&stressed), StatusLevel::Critical);
        let elevated = StatusInputs { stress: Some(StressLabel::Elevated), ..present(75.0) };
        assert_eq!(agg.classify(&elevated), StatusLevel::Warning);
    }

    #[test]
    fn unknown_bpm_is_ignored() {
        let agg = StatusAggregator::default();
        let inputs = StatusInputs { bpm: None, ..present(0.0) };
        assert_eq!(agg.classify(&inputs), StatusLevel::Normal);
    }

    #[test]
    fn absent_subject_forces_normal() {
        let mut agg = StatusAggregator::default();
        for _ in 0..10 {
            let update = agg.evaluate(&StatusInputs { human_present: false, ..present(200.0) });
            assert_eq!(update.level, StatusLevel::Normal);
            assert!(update.alert.is_none());
        }
    }

    #[test]
    fn alert_on_fifth_consecutive_tick() {
        let mut agg = StatusAggregator::default();
        for _ in 0..4 {
            assert!(agg.evaluate(&present(130.0)).alert.is_none());
        }
        let update = agg.evaluate(&present(130.0));
        let alert = update.alert.expect("fifth tick alerts");
        assert_eq!(alert.level, StatusLevel::Critical);
        assert_eq!(alert.sequence, 1);
        assert_eq!(agg.state().consecutive_critical_with_presence, 0);
        assert_eq!(agg.state().alerts_sent_in_episode, 1);
    }

    #[test]
    fn severity_switch_restarts_debounce() {
        let mut agg = StatusAggregator::default();
        for _ in 0..4 {
            agg.evaluate(&present(130.0));
        }
        // Warning tick zeroes the critical counter
        agg.evaluate(&present(110.0));
        assert_eq!(agg.state().consecutive_critical_with_presence, 0);
        assert_eq!(agg.state().consecutive_warning_with_presence, 1);

        for _ in 0..4 {
            assert!(agg.evaluate(&present(130.0)).alert.is_none());
        }
        assert!(agg.evaluate(&present(130.0)).alert.is_some());
    }

    #[test]
    fn episode_budget_caps_alerts() {
        let mut agg = StatusAggregator::default();
        let alerts = (0..100)
            .filter(|_| agg.evaluate(&present(40.0)).alert.is_some())
            .count();
        assert_eq!(alerts, 5);

        // Back to normal resets the budget
        agg.evaluate(&present(75.0));
        assert_eq!(agg.state().alerts_sent_in_episode, 0);
        let alerts = (0..25)
            .filter(|_| agg.evaluate(&present(40.0)).alert.is_some())
            .count();
        assert_eq!(alerts, 5);
    }

    #[test]
    fn losing_presence_ends_episode() {
        let mut agg = StatusAggregator::default();
        for _ in 0..5 {
            agg.evaluate(&present(130.0));
        }
        assert_eq!(agg.state().alerts_sent_in_episode, 1);

        let update = agg.evaluate(&StatusInputs { human_present: false, ..present(130.0) });
        assert_eq!(update.level, StatusLevel::Normal);
        assert!(update.changed());
        assert_eq!(agg.state(), &AggregatorState::default());
    }

    #[test]
    fn indicator_patterns() {
        assert_eq!(
            IndicatorPattern::for_status(StatusLevel::Normal, false),
            IndicatorPattern { green: true, ..IndicatorPattern::OFF }
        );
        assert_eq!(
            IndicatorPattern::for_status(StatusLevel::Warning, true),
            IndicatorPattern { yellow: true, ..IndicatorPattern::OFF }
        );
        let critical = IndicatorPattern::for_status(StatusLevel::Critical, true);
        assert!(critical.red && critical.buzzer && !critical.green);
        assert!(IndicatorPattern::for_status(StatusLevel::Critical, false).is_off());
        assert!(IndicatorPattern::OFF.is_off());
    }

    #[test]
    fn severity_order() {
        assert!(StatusLevel::Normal < StatusLevel::Warning);
        assert!(StatusLevel::Warning < StatusLevel::Critical);
    }
}
