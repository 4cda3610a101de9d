//! Sampling pipelines and their task runner
//!
//! ## Overview
//!
//! Each sensor gets its own task so a slow bus transaction on one channel
//! never stalls another. A pipeline is a step function over its private
//! detector state:
//!
//! ```text
//! tick ─→ spawn_blocking(step(now)) ─→ Ok  ─→ wait next tick
//!                                   └→ Err ─→ warn, sleep backoff, retry
//! ```
//!
//! The pipeline value moves into the blocking pool for the read and back
//! out afterwards, so detector state has exactly one owner at any time and
//! needs no lock. Only the snapshot write at the end of a step is shared.
//!
//! Sensor errors never leave their task. The loop observes shutdown between
//! steps and during the backoff pause.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use vitalguard_connectors::Shutdown;
use vitalguard_core::presence::stable_temperature;
use vitalguard_core::stress::average_sub_readings;
use vitalguard_core::{
    Channel, PresenceFilter, PulseDetector, PulseEvent, SampleSource, SensorError, SensorResult,
    SharedSnapshot, StressClassifier, TimeSource, Timestamp,
};

/// One periodic sensor pipeline
pub trait SamplingPipeline: Send + 'static {
    fn name(&self) -> &'static str;

    /// Read, detect and publish once; may block on the sensor bus
    fn step(&mut self, now: Timestamp) -> SensorResult<()>;
}

fn finite(channel: Channel, value: f64) -> SensorResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SensorError::InvalidReading { channel })
    }
}

/// Pulse voltage → beats → snapshot `bpm`
pub struct PulsePipeline {
    source: Arc<dyn SampleSource>,
    detector: PulseDetector,
    snapshot: SharedSnapshot,
}

impl PulsePipeline {
    pub fn new(source: Arc<dyn SampleSource>, detector: PulseDetector, snapshot: SharedSnapshot) -> Self {
        Self { source, detector, snapshot }
    }
}

impl SamplingPipeline for PulsePipeline {
    fn name(&self) -> &'static str {
        "pulse"
    }

    fn step(&mut self, now: Timestamp) -> SensorResult<()> {
        let adc_channel = self.detector.config().adc_channel;
        let volts = finite(Channel::Pulse, self.source.read_voltage(adc_channel)?)?;

        if let Some(PulseEvent::Beat(beat)) = self.detector.step(volts, now) {
            self.snapshot.update(|s| s.bpm = beat.bpm);
        }
        Ok(())
    }
}

/// Conductance → stress label and skin contact
pub struct StressPipeline {
    source: Arc<dyn SampleSource>,
    classifier: StressClassifier,
    snapshot: SharedSnapshot,
    buffer: Vec<f64>,
}

impl StressPipeline {
    pub fn new(source: Arc<dyn SampleSource>, classifier: StressClassifier, snapshot: SharedSnapshot) -> Self {
        let capacity = classifier.config().sub_readings;
        Self { source, classifier, snapshot, buffer: Vec::with_capacity(capacity) }
    }
}

impl SamplingPipeline for StressPipeline {
    fn name(&self) -> &'static str {
        "stress"
    }

    fn step(&mut self, _now: Timestamp) -> SensorResult<()> {
        self.buffer.clear();
        for _ in 0..self.classifier.config().sub_readings {
            let raw = finite(Channel::Conductance, self.source.read_conductance()?)?;
            self.buffer.push(raw);
        }
        let raw = average_sub_readings(&self.buffer)
            .ok_or(SensorError::InvalidReading { channel: Channel::Conductance })?;

        let reading = self.classifier.step(raw);
        self.snapshot.update(|s| {
            s.stress = Some(reading.label);
            s.contact = reading.contact;
        });
        Ok(())
    }
}

/// Object and ambient temperature → body temperature and presence
pub struct PresencePipeline {
    source: Arc<dyn SampleSource>,
    filter: PresenceFilter,
    snapshot: SharedSnapshot,
}

impl PresencePipeline {
    pub fn new(source: Arc<dyn SampleSource>, filter: PresenceFilter, snapshot: SharedSnapshot) -> Self {
        Self { source, filter, snapshot }
    }

    fn stable_object_temp(&self) -> SensorResult<f64> {
        let config = self.filter.config();
        let spacing = Duration::from_millis(config.reading_spacing_ms);
        let mut readings = Vec::with_capacity(config.stable_readings);
        for i in 0..config.stable_readings {
            if i > 0 && !spacing.is_zero() {
                std::thread::sleep(spacing);
            }
            readings.push(self.source.read_object_temp()?);
        }
        stable_temperature(readings).ok_or(SensorError::InvalidReading { channel: Channel::ObjectTemp })
    }
}

impl SamplingPipeline for PresencePipeline {
    fn name(&self) -> &'static str {
        "presence"
    }

    fn step(&mut self, _now: Timestamp) -> SensorResult<()> {
        let object = self.stable_object_temp()?;
        let ambient = finite(Channel::AmbientTemp, self.source.read_ambient_temp()?)?;

        let reading = self.filter.step(object, ambient);
        self.snapshot.update(|s| {
            s.body_detected = reading.human_present;
            s.temperature = reading.temperature;
        });
        Ok(())
    }
}

/// Run a pipeline every `period` until shutdown
pub async fn run_sampling<P, C>(
    mut pipeline: P,
    period: Duration,
    backoff: Duration,
    clock: C,
    mut shutdown: Shutdown,
) where
    P: SamplingPipeline,
    C: TimeSource,
{
    let name = pipeline.name();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    log::info!("{name} pipeline started ({period:?})");

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {}
        }

        let now = clock.now();
        let joined = tokio::task::spawn_blocking(move || {
            let result = pipeline.step(now);
            (pipeline, result)
        })
        .await;

        let result = match joined {
            Ok((returned, result)) => {
                pipeline = returned;
                result
            }
            Err(err) => {
                log::error!("{name} pipeline step panicked: {err}");
                return;
            }
        };

        if let Err(err) = result {
            log::warn!("{name} read failed: {err}; retrying in {backoff:?}");
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = sleep(backoff) => {}
            }
            ticker.reset();
        }
    }

    log::info!("{name} pipeline stopped");
}
