//! Status tick: aggregate, drive indicators, dispatch alerts
//!
//! The tick owns the actuator through a [`SafeStateGuard`]. Whatever way the
//! tick ends, normal return, panic or task cancellation, the guard drives
//! every indicator and the buzzer off.

use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use vitalguard_connectors::{AlertDispatcher, Shutdown};
use vitalguard_core::{
    Actuator, ActuatorError, IndicatorPattern, SharedSnapshot, StatusAggregator, StatusInputs,
    TimeSource,
};

/// Owns the actuator; applies the safe state when dropped
pub struct SafeStateGuard {
    actuator: Option<Box<dyn Actuator>>,
}

impl SafeStateGuard {
    pub fn new(actuator: Box<dyn Actuator>) -> Self {
        Self { actuator: Some(actuator) }
    }

    pub fn apply(&mut self, pattern: IndicatorPattern) -> Result<(), ActuatorError> {
        match self.actuator.as_mut() {
            Some(actuator) => actuator.apply(pattern),
            None => Ok(()),
        }
    }

    /// Drive everything off and give up the actuator
    pub fn finish(mut self) -> Result<(), ActuatorError> {
        match self.actuator.take() {
            Some(mut actuator) => actuator.safe_state(),
            None => Ok(()),
        }
    }
}

impl Drop for SafeStateGuard {
    fn drop(&mut self) {
        if let Some(actuator) = self.actuator.as_mut() {
            match actuator.safe_state() {
                Ok(()) => log::warn!("indicators forced off"),
                Err(err) => log::error!("cannot force indicators off: {err}"),
            }
        }
    }
}

/// One aggregator tick over the current snapshot
pub struct StatusTick {
    aggregator: StatusAggregator,
    dispatcher: AlertDispatcher,
    snapshot: SharedSnapshot,
    applied: Option<IndicatorPattern>,
}

impl StatusTick {
    pub fn new(aggregator: StatusAggregator, dispatcher: AlertDispatcher, snapshot: SharedSnapshot) -> Self {
        Self { aggregator, dispatcher, snapshot, applied: None }
    }

    pub fn run_once<C: TimeSource>(&mut self, guard: &mut SafeStateGuard, clock: &C) {
        let current = self.snapshot.read();
        let inputs = StatusInputs::from(&current);
        let update = self.aggregator.evaluate(&inputs);

        let alerted_at = update.alert.map(|_| clock.now());
        self.snapshot.update(|s| {
            s.status = update.level;
            if alerted_at.is_some() {
                s.last_alert_at = alerted_at;
            }
        });

        let pattern = IndicatorPattern::for_status(update.level, inputs.human_present);
        if self.applied != Some(pattern) {
            match guard.apply(pattern) {
                Ok(()) => self.applied = Some(pattern),
                Err(err) => {
                    // Retried next tick
                    log::warn!("indicator update failed: {err}");
                    self.applied = None;
                }
            }
        }

        if let Some(alert) = update.alert {
            // Delivery runs detached; the handle is not awaited
            drop(self.dispatcher.dispatch(&alert));
        }
    }

    pub fn aggregator(&self) -> &StatusAggregator {
        &self.aggregator
    }
}

/// Tick every `period` until shutdown, then hand the guard back
pub async fn run_status<C: TimeSource>(
    mut tick: StatusTick,
    mut guard: SafeStateGuard,
    period: Duration,
    clock: C,
    mut shutdown: Shutdown,
) -> SafeStateGuard {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    log::info!("status tick started ({period:?})");

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => tick.run_once(&mut guard, &clock),
        }
    }

    log::info!("status tick stopped");
    guard
}
