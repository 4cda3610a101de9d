//! Point-in-time view of every derived signal
//!
//! ## Overview
//!
//! [`SharedSnapshot`] is the only state shared between tasks. Each pipeline
//! writes its own fields, the aggregator writes `status` and `last_alert_at`,
//! and the display and streaming paths read a copy.
//!
//! ## Design Rationale
//!
//! [`Snapshot`] is `Copy` and small, so every access is read-copy-use:
//!
//! ```text
//! writer: lock ─ mutate fields ─ unlock
//! reader: lock ─ copy out ────── unlock ─ use copy
//! ```
//!
//! The lock is never held across I/O, `.await` or another lock, so there is no
//! lock ordering to get wrong. A reader always sees a state produced by a
//! completed update, never a half-written one.
//!
//! A writer that panics while holding the lock leaves the data intact (all
//! fields are plain values), so poisoning is recovered rather than propagated.

use crate::status::{StatusInputs, StatusLevel};
use crate::stress::StressLabel;
use crate::time::Timestamp;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Latest values of every derived signal
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    /// Smoothed heart rate, `0.0` until two beats are seen
    pub bpm: f64,
    pub stress: Option<StressLabel>,
    /// Body temperature, `0.0` when no body is detected
    pub temperature: f64,
    pub status: StatusLevel,
    /// Skin contact from the conductance electrodes
    pub contact: bool,
    /// Body temperature detected by the infrared sensor
    pub body_detected: bool,
    pub last_alert_at: Option<Timestamp>,
}

impl Snapshot {
    /// Subject is present: skin contact and a body temperature
    pub fn human_present(&self) -> bool {
        self.contact && self.body_detected
    }

    pub fn bpm(&self) -> Option<f64> {
        (self.bpm > 0.0 && self.bpm.is_finite()).then_some(self.bpm)
    }

    pub fn stress_label(&self) -> &'static str {
        self.stress.map(|s| s.as_str()).unwrap_or("None")
    }
}

impl From<&Snapshot> for StatusInputs {
    fn from(snapshot: &Snapshot) -> Self {
        StatusInputs {
            bpm: snapshot.bpm(),
            stress: snapshot.stress,
            temperature: snapshot.temperature,
            human_present: snapshot.human_present(),
        }
    }
}

/// Cloneable handle to the shared snapshot
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<Mutex<Snapshot>>,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("snapshot lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Consistent copy of the current state
    pub fn read(&self) -> Snapshot {
        *self.lock()
    }

    /// Copy without waiting
    ///
    /// Returns `None` if a writer holds the lock right now, so a periodic
    /// reader can fall back to its last copy.
    pub fn try_read(&self) -> Option<Snapshot> {
        match self.inner.try_lock() {
            Ok(guard) => Some(*guard),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(poisoned)) => Some(*poisoned.into_inner()),
        }
    }

    /// Mutate under the lock
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut guard = self.lock();
        f(&mut guard);
    }
}
