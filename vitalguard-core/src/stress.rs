//! Stress classification from galvanic skin response
//!
//! Skin conductance rises with sympathetic arousal, but only while the
//! electrodes touch skin. Two independent decisions are made per sample:
//!
//! 1. **Contact**: the raw (unsmoothed) sample is below `contact_threshold`.
//!    Without contact the label is [`StressLabel::NoContact`] regardless of
//!    history, and the smoothing window is cleared so a new contact session
//!    does not inherit open-circuit readings.
//! 2. **Stress band**: the smoothed value against the baseline:
//!
//! ```text
//!            0.9·b        1.1·b        1.3·b
//! ───Relaxed───┼───Normal───┼──Elevated──┼───High───→ conductance
//! ```

use crate::config::StressConfig;
use crate::constants::GSR_SMOOTHING_WINDOW;
use crate::window::SmoothingWindow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Discrete stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressLabel {
    Relaxed,
    Normal,
    Elevated,
    High,
    /// Electrodes are not on skin
    #[serde(rename = "No-Contact")]
    NoContact,
}

impl StressLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StressLabel::Relaxed => "Relaxed",
            StressLabel::Normal => "Normal",
            StressLabel::Elevated => "Elevated",
            StressLabel::High => "High",
            StressLabel::NoContact => "No-Contact",
        }
    }
}

impl fmt::Display for StressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one conductance sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressReading {
    pub label: StressLabel,
    /// Skin contact detected on the raw sample
    pub contact: bool,
    /// Window mean, `None` without contact
    pub smoothed: Option<f64>,
    pub raw: f64,
}

/// Smoothing conductance classifier
#[derive(Debug, Clone)]
pub struct StressClassifier {
    config: StressConfig,
    window: SmoothingWindow<GSR_SMOOTHING_WINDOW>,
}

impl StressClassifier {
    pub fn new(config: StressConfig) -> Self {
        Self { config, window: SmoothingWindow::new() }
    }

    /// Classify one (already sub-averaged) conductance sample
    pub fn step(&mut self, raw: f64) -> StressReading {
        if !raw.is_finite() || raw >= self.config.contact_threshold {
            if !self.window.is_empty() {
                log::debug!("skin contact lost at {raw:.0}");
            }
            self.window.clear();
            return StressReading {
                label: StressLabel::NoContact,
                contact: false,
                smoothed: None,
                raw,
            };
        }

        self.window.push(raw);
        let smoothed = self.window.average().unwrap_or(raw);
        let label = self.band(smoothed);
        log::debug!("conductance {raw:.0} smoothed {smoothed:.0}: {label}");

        StressReading { label, contact: true, smoothed: Some(smoothed), raw }
    }

    /// Map a smoothed value onto the four stress bands
    pub fn band(&self, smoothed: f64) -> StressLabel {
        let c = &self.config;
        if smoothed < c.baseline * c.relaxed_ratio {
            StressLabel::Relaxed
        } else if smoothed < c.baseline * c.normal_ratio {
            StressLabel::Normal
        } else if smoothed < c.baseline * c.elevated_ratio {
            StressLabel::Elevated
        } else {
            StressLabel::High
        }
    }

    /// Current window mean
    pub fn smoothed(&self) -> Option<f64> {
        self.window.average()
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }
}

impl Default for StressClassifier {
    fn default() -> Self {
        Self::new(StressConfig::default())
    }
}

/// Mean of immediate sub-readings, the "raw" sample fed to the classifier
pub fn average_sub_readings(readings: &[f64]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    Some(readings.iter().sum::<f64>() / readings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        let classifier = StressClassifier::default();

        assert_eq!(classifier.band(9_899.0), StressLabel::Relaxed);
        assert_eq!(classifier.band(9_900.5), StressLabel::Normal);
        assert_eq!(classifier.band(12_099.0), StressLabel::Normal);
        assert_eq!(classifier.band(12_100.5), StressLabel::Elevated);
        assert_eq!(classifier.band(14_299.0), StressLabel::Elevated);
        assert_eq!(classifier.band(14_300.5), StressLabel::High);
    }

    #[test]
    fn constant_input_is_normal_with_contact() {
        let mut classifier = StressClassifier::default();
        let mut last = None;
        for _ in 0..15 {
            last = Some(classifier.step(10_000.0));
        }

        let reading = last.unwrap();
        assert_eq!(reading.label, StressLabel::Normal);
        assert!(reading.contact);
        assert_eq!(reading.smoothed, Some(10_000.0));
    }

    #[test]
    fn no_contact_overrides_history() {
        let mut classifier = StressClassifier::default();
        for _ in 0..10 {
            classifier.step(9_000.0);
        }

        let reading = classifier.step(13_000.0);
        assert_eq!(reading.label, StressLabel::NoContact);
        assert!(!reading.contact);
        assert_eq!(classifier.smoothed(), None);
    }

    #[test]
    fn contact_resumes_with_fresh_window() {
        let mut classifier = StressClassifier::default();
        classifier.step(12_900.0);
        classifier.step(20_000.0);

        let reading = classifier.step(9_000.0);
        assert_eq!(reading.smoothed, Some(9_000.0));
        assert_eq!(reading.label, StressLabel::Relaxed);
    }

    #[test]
    fn smoothing_delays_label_changes() {
        let mut classifier = StressClassifier::default();
        for _ in 0..9 {
            classifier.step(11_000.0);
        }
        // One elevated spike moves the mean by 1/10 of the jump only
        let reading = classifier.step(12_900.0);
        assert_eq!(reading.label, StressLabel::Normal);
    }

    #[test]
    fn sub_reading_average() {
        assert_eq!(average_sub_readings(&[]), None);
        assert_eq!(average_sub_readings(&[10.0, 20.0, 30.0]), Some(20.0));
    }

    #[test]
    fn label_wire_names() {
        assert_eq!(StressLabel::NoContact.to_string(), "No-Contact");
        assert_eq!(serde_json::to_string(&StressLabel::NoContact).unwrap(), "\"No-Contact\"");
        assert_eq!(serde_json::to_string(&StressLabel::Elevated).unwrap(), "\"Elevated\"");
    }
}
