//! Default thresholds and cadences
//!
//! Every value here is a configuration default, not a protocol constant.
//! They were tuned empirically for one wiring (ADS1115 ADC at gain 1, a Grove
//! GSR module and an MLX90614 infrared thermometer) and should be re-tuned for
//! other hardware through [`MonitorConfig`](crate::config::MonitorConfig).
//!
//! Units are part of every name.

// ===== PULSE =====

/// Voltage above which the pulse channel counts as a peak (V).
pub const PULSE_HIGH_THRESHOLD_V: f64 = 2.5;

/// Voltage the pulse channel must fall under before the next peak can count (V).
pub const PULSE_LOW_THRESHOLD_V: f64 = 1.5;

/// Shortest accepted beat-to-beat interval (ms). 400 ms caps detection at 150 BPM.
pub const PULSE_MIN_INTERVAL_MS: u64 = 400;

/// ADC input the pulse sensor is wired to.
pub const PULSE_ADC_CHANNEL: u8 = 0;

/// Trailing window for BPM display smoothing.
pub const BPM_SMOOTHING_WINDOW: usize = 5;

// ===== SKIN CONDUCTANCE =====

/// Resting conductance of the reference subject (raw ADC units).
pub const GSR_BASELINE: f64 = 11_000.0;

/// Below `baseline * ratio` the subject is relaxed.
pub const GSR_RELAXED_RATIO: f64 = 0.9;

/// Below `baseline * ratio` (and above relaxed) stress is normal.
pub const GSR_NORMAL_RATIO: f64 = 1.1;

/// Below `baseline * ratio` (and above normal) stress is elevated; above is high.
pub const GSR_ELEVATED_RATIO: f64 = 1.3;

/// Raw conductance at or above this means the electrodes are not on skin.
pub const GSR_CONTACT_THRESHOLD: f64 = 13_000.0;

/// Immediate sub-readings averaged into one conductance sample.
pub const GSR_AVERAGE_COUNT: usize = 10;

/// Smoothing window over conductance samples.
pub const GSR_SMOOTHING_WINDOW: usize = 10;

// ===== BODY TEMPERATURE =====

/// Lower bound of a plausible human skin temperature (°C).
pub const HUMAN_TEMP_MIN_C: f64 = 35.8;

/// Upper bound of a plausible human skin temperature (°C).
pub const HUMAN_TEMP_MAX_C: f64 = 40.0;

/// Initial margin a body must exceed ambient by (°C).
pub const AMBIENT_OFFSET_BASELINE_C: f64 = 2.5;

/// Margin growth after `PRESENCE_MAX_ATTEMPTS` consecutive misses (°C).
pub const AMBIENT_OFFSET_STEP_C: f64 = 0.1;

/// Consecutive misses before the ambient margin widens.
pub const PRESENCE_MAX_ATTEMPTS: u32 = 3;

/// Raw object readings averaged per presence decision.
pub const STABLE_TEMP_READINGS: usize = 20;

/// Pause between averaged object readings (ms).
pub const STABLE_TEMP_SPACING_MS: u64 = 20;

// ===== STATUS =====

/// Heart rate below this is critical (BPM).
pub const CRITICAL_BPM_LOW: f64 = 50.0;

/// Heart rate above this is critical (BPM).
pub const CRITICAL_BPM_HIGH: f64 = 120.0;

/// Heart rate below this (and not critical) is a warning (BPM).
pub const WARNING_BPM_LOW: f64 = 60.0;

/// Heart rate above this (and not critical) is a warning (BPM).
pub const WARNING_BPM_HIGH: f64 = 100.0;

/// Body temperature above this is critical (°C).
pub const CRITICAL_TEMP_C: f64 = 39.0;

/// Body temperature above this is a warning (°C).
pub const WARNING_TEMP_C: f64 = 37.8;

/// Consecutive ticks at one severity before an alert is dispatched.
pub const ALERT_DEBOUNCE_TICKS: u32 = 5;

/// Alerts allowed per non-Normal episode.
pub const MAX_ALERTS_PER_EPISODE: u32 = 5;

// ===== CADENCE =====

/// Pulse polling period, 10 Hz (ms).
pub const PULSE_PERIOD_MS: u64 = 100;

/// Conductance sampling period (ms).
pub const STRESS_PERIOD_MS: u64 = 3_000;

/// Presence decision period (ms).
pub const PRESENCE_PERIOD_MS: u64 = 1_000;

/// Status aggregation tick (ms).
pub const AGGREGATOR_PERIOD_MS: u64 = 1_000;

/// Display refresh period (ms).
pub const DISPLAY_PERIOD_MS: u64 = 1_500;

/// Pause after a failed sensor read before the pipeline resumes (ms).
pub const SENSOR_ERROR_BACKOFF_MS: u64 = 1_000;

/// Snapshot streaming period on the control channel (ms).
pub const STREAM_PERIOD_MS: u64 = 1_000;

/// BPM values kept for the display trend line.
pub const BPM_HISTORY_LEN: usize = 20;

// ===== CONTROL CHANNEL =====

/// Default listen address for remote clients.
pub const CONTROL_BIND_ADDR: &str = "0.0.0.0:8765";
