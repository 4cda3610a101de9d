//! Shared signal generators for integration tests
//!
//! - Pulse voltage trains sampled the way the pulse pipeline polls
//! - Noisy conductance series
//! - A small deterministic RNG so failures reproduce

#![allow(dead_code)]

use vitalguard_core::{PulseDetector, PulseEvent, Timestamp};

/// Pulse pipeline poll period (ms)
pub const POLL_MS: u64 = 100;

/// Voltage of a sampled pulse train
///
/// One rectangular pulse of `width_ms` at 3.0 V per `period_ms`, 0.5 V
/// between pulses.
pub fn pulse_train(period_ms: u64, width_ms: u64, duration_ms: u64) -> Vec<(Timestamp, f64)> {
    (0..duration_ms)
        .step_by(POLL_MS as usize)
        .map(|t| {
            let volts = if t % period_ms < width_ms { 3.0 } else { 0.5 };
            (t, volts)
        })
        .collect()
}

/// Feed `(time, volts)` pairs and collect the events
pub fn run_detector(detector: &mut PulseDetector, samples: &[(Timestamp, f64)]) -> Vec<PulseEvent> {
    samples
        .iter()
        .filter_map(|&(t, v)| detector.step(v, t))
        .collect()
}

/// Xorshift RNG
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16_777_216.0
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Conductance around `center` with uniform noise of `±spread`
pub fn noisy_conductance(rng: &mut TestRng, center: f64, spread: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|_| center + rng.gen_range(-spread, spread))
        .collect()
}
