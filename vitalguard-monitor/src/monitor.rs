//! Process lifecycle
//!
//! ## Overview
//!
//! ```text
//! validate config ─→ probe sensors ─→ bind control server      (fatal on error)
//!        │
//!        ▼
//! spawn: pulse │ stress │ presence │ status tick │ display │ server
//!        │
//!   shutdown signal
//!        │
//!        ▼
//! join every task ─→ indicators OFF                             (last action)
//! ```
//!
//! Initialization failures surface before any task starts: the monitor never
//! runs with a dead sensor or an unbindable control port. After that, sensor
//! errors stay inside their pipeline.

use crate::actuation::{run_status, SafeStateGuard, StatusTick};
use crate::display::run_display;
use crate::pipeline::{run_sampling, PresencePipeline, PulsePipeline, StressPipeline};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use vitalguard_connectors::websocket::{self, ControlState};
use vitalguard_connectors::{AlertDispatcher, Notifier, Shutdown, TransportError};
use vitalguard_core::{
    Actuator, ActuatorError, Channel, ConfigError, DisplaySink, MonitorConfig, MonotonicTime,
    PresenceFilter, PulseDetector, SampleSource, SensorError, SharedSnapshot, StatusAggregator,
    StressClassifier,
};

/// Fatal monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("sensor probe failed: {0}")]
    Probe(#[from] SensorError),

    #[error("control server: {0}")]
    Control(#[from] TransportError),

    #[error("cannot reach safe state: {0}")]
    Actuator(#[from] ActuatorError),
}

/// Wires collaborators to the engine and runs it
pub struct Monitor {
    config: MonitorConfig,
    source: Arc<dyn SampleSource>,
    actuator: Box<dyn Actuator>,
    display: Box<dyn DisplaySink>,
    notifier: Arc<dyn Notifier>,
    snapshot: SharedSnapshot,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn SampleSource>,
        actuator: Box<dyn Actuator>,
        display: Box<dyn DisplaySink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            source,
            actuator,
            display,
            notifier,
            snapshot: SharedSnapshot::new(),
        }
    }

    /// Handle to the live snapshot
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Check every sensor channel answers
    pub fn probe(&self) -> Result<(), SensorError> {
        probe_sensors(self.source.as_ref(), self.config.pulse.adc_channel)
    }

    /// Run until `shutdown` fires
    pub async fn run(self, shutdown: Shutdown) -> Result<(), MonitorError> {
        let Monitor { config, source, actuator, display, notifier, snapshot } = self;
        // Dropped on any early return: indicators end up off
        let guard = SafeStateGuard::new(actuator);

        config.validate()?;
        probe_sensors(source.as_ref(), config.pulse.adc_channel)?;
        log::info!("all sensors answered");

        let listener = if config.control.enabled {
            Some(websocket::bind(&config.control.bind).await?)
        } else {
            None
        };

        let clock = MonotonicTime::new();
        let backoff = config.cadence.error_backoff();
        let mut tasks = JoinSet::new();

        tasks.spawn(run_sampling(
            PulsePipeline::new(source.clone(), PulseDetector::new(config.pulse.clone()), snapshot.clone()),
            config.cadence.pulse(),
            backoff,
            clock.clone(),
            shutdown.clone(),
        ));
        tasks.spawn(run_sampling(
            StressPipeline::new(source.clone(), StressClassifier::new(config.stress.clone()), snapshot.clone()),
            config.cadence.stress(),
            backoff,
            clock.clone(),
            shutdown.clone(),
        ));
        tasks.spawn(run_sampling(
            PresencePipeline::new(source.clone(), PresenceFilter::new(config.presence.clone()), snapshot.clone()),
            config.cadence.presence(),
            backoff,
            clock.clone(),
            shutdown.clone(),
        ));
        tasks.spawn(run_display(snapshot.clone(), display, config.cadence.display(), shutdown.clone()));

        if let Some(listener) = listener {
            let state = ControlState {
                snapshot: snapshot.clone(),
                stream_interval: config.control.stream_interval(),
                shutdown: shutdown.clone(),
            };
            tasks.spawn(async move {
                if let Err(err) = websocket::serve(listener, state).await {
                    log::error!("control server failed: {err}");
                }
            });
        }

        let tick = StatusTick::new(
            StatusAggregator::new(config.status.clone()),
            AlertDispatcher::new(notifier),
            snapshot.clone(),
        );
        let status = tokio::spawn(run_status(
            tick,
            guard,
            config.cadence.aggregator(),
            clock,
            shutdown.clone(),
        ));

        let mut shutdown = shutdown;
        shutdown.recv().await;
        log::info!("shutting down");

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                log::error!("task ended abnormally: {err}");
            }
        }

        match status.await {
            Ok(guard) => {
                guard.finish()?;
                log::info!("indicators off");
            }
            // Guard already applied the safe state while unwinding
            Err(err) => log::error!("status tick ended abnormally: {err}"),
        }
        Ok(())
    }
}

fn probe_sensors(source: &dyn SampleSource, adc_channel: u8) -> Result<(), SensorError> {
    for channel in Channel::ALL {
        source.probe(channel, adc_channel)?;
        log::debug!("{channel} sensor ok");
    }
    Ok(())
}
