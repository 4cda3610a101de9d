//! Display task
//!
//! Reads the snapshot on its own cadence and hands a frame to the sink. Keeps
//! the last [`BPM_HISTORY_LEN`] heart rates for the sink to plot.

use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use vitalguard_connectors::Shutdown;
use vitalguard_core::constants::BPM_HISTORY_LEN;
use vitalguard_core::{DisplayFrame, DisplaySink, SharedSnapshot, SmoothingWindow, Timestamp};

/// Frame builder with history
#[derive(Debug, Default)]
pub struct DisplayState {
    history: SmoothingWindow<BPM_HISTORY_LEN>,
    last_alert_seen: Option<Timestamp>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the snapshot and render one frame
    pub fn refresh(&mut self, snapshot: &SharedSnapshot, sink: &mut dyn DisplaySink) {
        let current = snapshot.read();
        if let Some(bpm) = current.bpm() {
            self.history.push(bpm);
        }

        let alert_sent = current.last_alert_at.is_some() && current.last_alert_at != self.last_alert_seen;
        self.last_alert_seen = current.last_alert_at;

        let history: Vec<f64> = self.history.iter().collect();
        sink.render(&DisplayFrame { snapshot: current, bpm_history: &history, alert_sent });
    }
}

pub async fn run_display(
    snapshot: SharedSnapshot,
    mut sink: Box<dyn DisplaySink>,
    period: Duration,
    mut shutdown: Shutdown,
) {
    let mut state = DisplayState::new();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => state.refresh(&snapshot, sink.as_mut()),
        }
    }
    log::info!("display stopped");
}
