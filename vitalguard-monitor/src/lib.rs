//! VitalGuard runtime
//!
//! Runs the core engine as a set of tokio tasks:
//!
//! | Task        | Default cadence | Writes                       |
//! |-------------|-----------------|------------------------------|
//! | pulse       | 100 ms          | `bpm`                        |
//! | stress      | 3 s             | `stress`, `contact`          |
//! | presence    | 1 s             | `temperature`, `body_detected` |
//! | status tick | 1 s             | `status`, `last_alert_at`    |
//! | display     | 1.5 s           | -                            |
//! | sessions    | 1 s per client  | -                            |
//!
//! Sensor reads run on the blocking pool. Every task stops on the shared
//! [`Shutdown`](vitalguard_connectors::Shutdown) signal, and the indicators
//! are driven off after all of them have finished.

#![deny(unsafe_code)]

pub mod actuation;
pub mod display;
pub mod hardware;
pub mod monitor;
pub mod pipeline;

pub use actuation::{SafeStateGuard, StatusTick};
pub use hardware::{LogActuator, LogDisplay, SimulatedSource, SimulatedVitals};
pub use monitor::{Monitor, MonitorError};
pub use pipeline::SamplingPipeline;
