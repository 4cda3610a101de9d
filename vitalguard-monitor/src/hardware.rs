//! Stand-in collaborators for running without sensor hardware
//!
//! [`SimulatedSource`] synthesizes every channel from a few target vitals:
//!
//! - Pulse: a rectangular wave at the target heart rate, peak 3.0 V for the
//!   first quarter of each period, 0.8 V otherwise
//! - Conductance, object and ambient temperature: constant targets with
//!   small uniform noise
//!
//! The waveform is a function of elapsed time, so any polling rate sees a
//! consistent signal.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use vitalguard_core::{
    Actuator, ActuatorError, DisplayFrame, DisplaySink, IndicatorPattern, SampleSource,
    SensorResult,
};

const PULSE_PEAK_V: f64 = 3.0;
const PULSE_REST_V: f64 = 0.8;

/// Target values the simulation produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedVitals {
    pub bpm: f64,
    pub conductance: f64,
    pub body_temp_c: f64,
    pub ambient_temp_c: f64,
}

impl SimulatedVitals {
    /// Calm adult at rest, electrodes attached
    pub fn resting() -> Self {
        Self { bpm: 72.0, conductance: 10_500.0, body_temp_c: 36.6, ambient_temp_c: 22.0 }
    }

    /// Sustained heart rate above the critical band
    pub fn tachycardia() -> Self {
        Self { bpm: 130.0, ..Self::resting() }
    }

    /// Elevated body temperature
    pub fn fever() -> Self {
        Self { body_temp_c: 38.4, ..Self::resting() }
    }

    /// Nobody there: open electrodes, room temperature target
    pub fn detached() -> Self {
        Self { bpm: 0.0, conductance: 20_000.0, body_temp_c: 22.5, ambient_temp_c: 22.0 }
    }
}

impl Default for SimulatedVitals {
    fn default() -> Self {
        Self::resting()
    }
}

/// Synthetic [`SampleSource`]; the pulse phase follows wall time since construction
#[derive(Debug)]
pub struct SimulatedSource {
    vitals: SimulatedVitals,
    started: Instant,
    rng: AtomicU32,
}

impl SimulatedSource {
    pub fn new(vitals: SimulatedVitals) -> Self {
        Self { vitals, started: Instant::now(), rng: AtomicU32::new(0x9E37_79B9) }
    }

    pub fn vitals(&self) -> &SimulatedVitals {
        &self.vitals
    }

    /// Uniform noise in `[-amplitude, amplitude)`
    fn noise(&self, amplitude: f64) -> f64 {
        let step = |mut x: u32| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x
        };
        let previous = self
            .rng
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| Some(step(x)))
            .unwrap_or_else(|x| x);
        let unit = (step(previous) >> 8) as f64 / 16_777_216.0;
        (unit * 2.0 - 1.0) * amplitude
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(SimulatedVitals::default())
    }
}

impl SampleSource for SimulatedSource {
    fn read_voltage(&self, _adc_channel: u8) -> SensorResult<f64> {
        if self.vitals.bpm <= 0.0 {
            return Ok(PULSE_REST_V + self.noise(0.05));
        }
        let period_ms = (60_000.0 / self.vitals.bpm).max(1.0) as u64;
        let phase = self.elapsed_ms() % period_ms;
        let level = if phase < period_ms / 4 { PULSE_PEAK_V } else { PULSE_REST_V };
        Ok(level + self.noise(0.05))
    }

    fn read_conductance(&self) -> SensorResult<f64> {
        Ok(self.vitals.conductance + self.noise(150.0))
    }

    fn read_object_temp(&self) -> SensorResult<f64> {
        Ok(self.vitals.body_temp_c + self.noise(0.1))
    }

    fn read_ambient_temp(&self) -> SensorResult<f64> {
        Ok(self.vitals.ambient_temp_c + self.noise(0.05))
    }
}

/// Logs indicator changes instead of driving GPIO
#[derive(Debug, Default)]
pub struct LogActuator {
    current: IndicatorPattern,
}

impl Actuator for LogActuator {
    fn apply(&mut self, pattern: IndicatorPattern) -> Result<(), ActuatorError> {
        if pattern != self.current {
            log::info!(
                "indicators: green={} yellow={} red={} buzzer={}",
                pattern.green,
                pattern.yellow,
                pattern.red,
                pattern.buzzer
            );
            self.current = pattern;
        }
        Ok(())
    }
}

/// Logs each frame instead of drawing it
#[derive(Debug, Default)]
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn render(&mut self, frame: &DisplayFrame<'_>) {
        let s = &frame.snapshot;
        let bpm = s.bpm().map(|b| format!("{b:.0}")).unwrap_or_else(|| "--".into());
        let temperature = if s.temperature > 0.0 {
            format!("{:.1}C", s.temperature)
        } else {
            "--".into()
        };
        log::info!(
            "BPM {bpm} | Temp {temperature} | Stress {} | {}{}",
            s.stress_label(),
            s.status,
            if frame.alert_sent { " | Alert Sent" } else { "" }
        );
        log::debug!("bpm history: {:?}", frame.bpm_history);
    }
}
