//! Heart beat detection from the pulse sensor voltage
//!
//! ## Overview
//!
//! The optical pulse sensor produces one voltage swing per heart beat. The
//! detector polls it (~10 Hz) and counts a beat on a **rising edge** through
//! the high threshold, not on the level:
//!
//! ```text
//!  V
//! 2.5 ─ ─ ─ ─┌──────┐─ ─ ─ ─ ─ ─ ─ ┌──┐ ─ ─   high: count once, disarm
//!            │      │              │  │
//! 1.5 ─ ─ ─ ─│─ ─ ─ │─ ─┐ ─ ─ ─ ─ ─│─ │─ ─    low: re-arm
//!        ────┘      └───┴──────────┘  └──
//!            ↑ beat                  ↑ beat
//! ```
//!
//! A plateau above the high threshold therefore yields exactly one beat, no
//! matter how many samples it spans. The latch re-arms only after the signal
//! falls under the low threshold.
//!
//! ## Refractory Period
//!
//! A rising edge less than `min_interval_ms` after the last counted beat is
//! coalesced into that beat. It consumes the latch but does not move the beat
//! time, so BPM is only recomputed by the first edge of a burst.
//!
//! ## Smoothing
//!
//! The instantaneous rate `60000 / interval_ms` jumps visibly from beat to
//! beat. The reported BPM is the trailing mean of the last
//! [`BPM_SMOOTHING_WINDOW`] instantaneous values. For a perfectly periodic
//! signal every instantaneous value is identical, so the mean equals `60 / p`.
//!
//! The very first qualifying edge only records a beat time; there is no
//! interval to measure until the second one.

use crate::config::PulseConfig;
use crate::constants::BPM_SMOOTHING_WINDOW;
use crate::sample::{Channel, Sample};
use crate::time::{delta_ms, Timestamp};
use crate::window::SmoothingWindow;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Detector state, owned by the pulse pipeline alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseState {
    /// Time of the last counted beat
    pub last_beat_time: Option<Timestamp>,
    /// Latch: `true` once the signal has dropped under the low threshold
    pub armed: bool,
    /// Smoothed BPM, 0.0 until the second beat
    pub current_bpm: f64,
}

impl PulseState {
    fn new() -> Self {
        Self { last_beat_time: None, armed: true, current_bpm: 0.0 }
    }

    pub fn first_beat_seen(&self) -> bool {
        self.last_beat_time.is_some()
    }
}

/// A counted beat with a measurable interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    pub at: Timestamp,
    pub interval_ms: u64,
    /// `60000 / interval_ms`
    pub instantaneous_bpm: f64,
    /// Trailing mean reported to the rest of the system
    pub bpm: f64,
}

/// Outcome of a qualifying rising edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseEvent {
    /// First edge ever seen; recorded, no rate yet
    FirstBeat { at: Timestamp },
    /// Second or later edge
    Beat(Beat),
}

/// Edge-triggered heart beat detector
#[derive(Debug, Clone)]
pub struct PulseDetector {
    config: PulseConfig,
    state: PulseState,
    smoothing: SmoothingWindow<BPM_SMOOTHING_WINDOW>,
}

impl PulseDetector {
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config,
            state: PulseState::new(),
            smoothing: SmoothingWindow::new(),
        }
    }

    /// Feed one pulse channel sample
    ///
    /// Samples from other channels are ignored.
    pub fn process(&mut self, sample: &Sample) -> Option<PulseEvent> {
        if sample.channel != Channel::Pulse {
            return None;
        }
        self.step(sample.value, sample.timestamp)
    }

    /// Feed one voltage reading taken at `now`
    pub fn step(&mut self, volts: f64, now: Timestamp) -> Option<PulseEvent> {
        if !volts.is_finite() {
            return None;
        }

        if volts < self.config.low_threshold_v {
            self.state.armed = true;
            return None;
        }

        if volts <= self.config.high_threshold_v || !self.state.armed {
            return None;
        }

        // Rising edge through the high threshold
        self.state.armed = false;

        let Some(last) = self.state.last_beat_time else {
            self.state.last_beat_time = Some(now);
            log::trace!("first beat at {now}");
            return Some(PulseEvent::FirstBeat { at: now });
        };

        let interval_ms = delta_ms(last, now);
        if interval_ms < self.config.min_interval_ms {
            log::trace!("edge {interval_ms} ms after last beat coalesced");
            return None;
        }

        self.state.last_beat_time = Some(now);
        let instantaneous_bpm = MS_PER_MINUTE / interval_ms as f64;
        self.smoothing.push(instantaneous_bpm);
        let bpm = self.smoothing.average().unwrap_or(instantaneous_bpm);
        self.state.current_bpm = bpm;

        log::debug!("beat: interval {interval_ms} ms, {instantaneous_bpm:.1} BPM (smoothed {bpm:.1})");

        Some(PulseEvent::Beat(Beat { at: now, interval_ms, instantaneous_bpm, bpm }))
    }

    /// Smoothed BPM, `None` until two beats have been counted
    pub fn bpm(&self) -> Option<f64> {
        self.smoothing.average()
    }

    pub fn state(&self) -> &PulseState {
        &self.state
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }
}

impl Default for PulseDetector {
    fn default() -> Self {
        Self::new(PulseConfig::default())
    }
}
