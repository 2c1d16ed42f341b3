//! Sensor monitor.
//!
//! Turns raw leak/power readings into [`FaultFlags`].  The controller calls
//! [`SensorMonitor::refresh`] only when the `check` deadline has elapsed,
//! which makes the check cadence the single debounce point: between
//! refreshes the flags are held constant.
//!
//! ## Fault lifecycle
//!
//! 1. A reading trips (leak probe wet, supply lost).
//! 2. The flag is set and logged once, on the rising edge.
//! 3. While any flag is set the check timer uses the error interval.
//! 4. When the sensor reads healthy again the flag clears and is logged.
//!
//! A power fault additionally records when it started so the controller
//! can tell a brown-out from a persistent outage.

use log::{error, info};
use serde::Serialize;

use crate::app::ports::{LeakSensor, PowerSensor};
use crate::config::StationConfig;
use crate::deadline::{DeadlineSet, Millis, Timer};
use crate::error::StationFault;

/// Debounced fault state, refreshed once per check interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FaultFlags {
    pub leak_detected: bool,
    pub power_fault: bool,
}

impl FaultFlags {
    /// Both sensors healthy.
    pub const CLEAR: Self = Self {
        leak_detected: false,
        power_fault: false,
    };

    /// `true` if **any** fault is active.
    pub fn any(&self) -> bool {
        self.leak_detected || self.power_fault
    }

    /// The fault that governs the response, power taking priority.
    pub fn primary(&self) -> Option<StationFault> {
        if self.power_fault {
            Some(StationFault::PowerFault)
        } else if self.leak_detected {
            Some(StationFault::LeakDetected)
        } else {
            None
        }
    }
}

/// Polls the leak and power sensors on the check cadence.
pub struct SensorMonitor {
    leak_threshold: u16,
    check_interval_ms: Millis,
    error_interval_ms: Millis,
    flags: FaultFlags,
    /// When the current power fault was first observed.
    power_fault_since: Option<Millis>,
}

impl SensorMonitor {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            leak_threshold: config.leak_analog_threshold,
            check_interval_ms: config.check_interval_ms,
            error_interval_ms: config.error_check_interval_ms,
            flags: FaultFlags::CLEAR,
            power_fault_since: None,
        }
    }

    /// Read both sensors, update the flags, and re-arm the check timer.
    ///
    /// Leak is the OR of the analog threshold and the digital contact:
    /// either sensor alone is enough.
    pub fn refresh<S>(&mut self, sensors: &mut S, deadlines: &mut DeadlineSet) -> FaultFlags
    where
        S: LeakSensor + PowerSensor + ?Sized,
    {
        let analog = sensors.analog_reading();
        let leak = analog > self.leak_threshold || sensors.digital_tripped();
        let power = sensors.tripped();

        self.eval_fault(StationFault::LeakDetected, leak);
        self.eval_fault(StationFault::PowerFault, power);

        self.power_fault_since = match (power, self.power_fault_since) {
            (true, None) => Some(deadlines.now()),
            (true, since) => since,
            (false, _) => None,
        };

        let interval = if self.flags.any() {
            self.error_interval_ms
        } else {
            self.check_interval_ms
        };
        deadlines.arm(Timer::Check, interval);

        self.flags
    }

    /// How long the power fault has persisted as of `now`, if active.
    pub fn power_fault_duration(&self, now: Millis) -> Option<Millis> {
        self.power_fault_since.map(|since| now.wrapping_sub(since))
    }

    /// Drop all latched state (used on wake: readings are re-derived).
    pub fn reset(&mut self) {
        self.flags = FaultFlags::CLEAR;
        self.power_fault_since = None;
    }

    // ── Internal ──────────────────────────────────────────────────

    fn eval_fault(&mut self, fault: StationFault, condition: bool) {
        let flag = match fault {
            StationFault::LeakDetected => &mut self.flags.leak_detected,
            StationFault::PowerFault => &mut self.flags.power_fault,
            StationFault::DeepFault => return,
        };
        if condition && !*flag {
            error!("FAULT SET: {fault}");
        } else if !condition && *flag {
            info!("FAULT CLEARED: {fault}");
        }
        *flag = condition;
    }
}
