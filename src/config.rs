//! Station timing and threshold parameters.
//!
//! Every tunable value is a named compile-time constant.  The station is
//! not reconfigurable at runtime: [`StationConfig::default()`] is built
//! from these constants and handed to the controller once at startup.

use serde::Serialize;

use crate::error::Error;

// --- Sensors ---

/// Analog leak-sensor reading (raw 10-bit ADC counts) above which water is
/// considered present.  A dry probe reads close to zero.
pub const LEAK_ANALOG_THRESHOLD: u16 = 300;

// --- Control cadence ---

/// Sensor re-check interval while the station is healthy (ms).
pub const CHECK_INTERVAL_MS: u64 = 1_000;

/// Sensor re-check interval while a fault is active (ms).
/// Never longer than [`CHECK_INTERVAL_MS`].
pub const ERROR_CHECK_INTERVAL_MS: u64 = 500;

/// Hard upper bound on a valve open/close stroke (ms).  The valve has no
/// end-stop feedback, so once this elapses the stroke is assumed complete.
pub const VALVE_TRANSITION_TIMEOUT_MS: u64 = 15_000;

// --- Annunciation ---

/// Status report cadence (ms).
pub const DISPLAY_INTERVAL_MS: u64 = 2_000;

/// Minimum spacing between repeated alarm tones while a fault persists (ms).
pub const ALARM_INTERVAL_MS: u64 = 30_000;

/// Status LED half-period while the station runs normally (ms).
pub const LED_SLOW_BLINK_MS: u64 = 1_000;

/// Status LED half-period while a fault is latched (ms).
pub const LED_FAST_BLINK_MS: u64 = 250;

// --- Deep fault ---

/// A power fault lasting this long with the valve closed suspends the
/// station until an external wake (ms).
pub const DEEP_FAULT_AFTER_MS: u64 = 5 * 60 * 1_000;

/// Station configuration handed to [`StationService`](crate::app::service::StationService).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationConfig {
    // --- Sensors ---
    /// Leak analog threshold (raw ADC counts).
    pub leak_analog_threshold: u16,

    // --- Control cadence ---
    /// Healthy sensor re-check interval (ms).
    pub check_interval_ms: u64,
    /// Faulted sensor re-check interval (ms).
    pub error_check_interval_ms: u64,
    /// Valve stroke timeout (ms).
    pub valve_timeout_ms: u64,

    // --- Annunciation ---
    /// Status report interval (ms).
    pub display_interval_ms: u64,
    /// Alarm tone repeat interval (ms).
    pub alarm_interval_ms: u64,
    /// LED toggle interval while healthy (ms).
    pub slow_blink_ms: u64,
    /// LED toggle interval while faulted (ms).
    pub fast_blink_ms: u64,

    // --- Deep fault ---
    /// Persistent power fault duration before suspending (ms).
    pub deep_fault_after_ms: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            leak_analog_threshold: LEAK_ANALOG_THRESHOLD,
            check_interval_ms: CHECK_INTERVAL_MS,
            error_check_interval_ms: ERROR_CHECK_INTERVAL_MS,
            valve_timeout_ms: VALVE_TRANSITION_TIMEOUT_MS,
            display_interval_ms: DISPLAY_INTERVAL_MS,
            alarm_interval_ms: ALARM_INTERVAL_MS,
            slow_blink_ms: LED_SLOW_BLINK_MS,
            fast_blink_ms: LED_FAST_BLINK_MS,
            deep_fault_after_ms: DEEP_FAULT_AFTER_MS,
        }
    }
}

impl StationConfig {
    /// Reject parameter sets the controller cannot run safely with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.check_interval_ms == 0 {
            return Err(Error::Config("check interval must be non-zero"));
        }
        if self.error_check_interval_ms == 0
            || self.error_check_interval_ms > self.check_interval_ms
        {
            return Err(Error::Config(
                "error interval must be non-zero and no longer than the check interval",
            ));
        }
        if self.valve_timeout_ms == 0 {
            return Err(Error::Config("valve timeout must be non-zero"));
        }
        if self.display_interval_ms == 0 || self.alarm_interval_ms == 0 {
            return Err(Error::Config("annunciation intervals must be non-zero"));
        }
        if self.fast_blink_ms == 0 || self.fast_blink_ms >= self.slow_blink_ms {
            return Err(Error::Config("fast blink must be non-zero and faster than slow blink"));
        }
        if self.deep_fault_after_ms <= self.valve_timeout_ms {
            return Err(Error::Config("deep-fault threshold must exceed one valve stroke"));
        }
        Ok(())
    }
}
