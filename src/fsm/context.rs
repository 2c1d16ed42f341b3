//! Shared mutable context threaded through every state handler.
//!
//! `StationContext` owns everything the handlers read and write: the
//! deadline set, the sensor monitor and its latched flags, the valve
//! actuator, and the configuration.  Nothing in here is heap-allocated.

use crate::config::StationConfig;
use crate::deadline::DeadlineSet;
use crate::error::StationFault;
use crate::monitor::{FaultFlags, SensorMonitor};
use crate::valve::ValveActuator;

pub struct StationContext {
    /// Station configuration.
    pub config: StationConfig,

    // -- Timing --
    /// Absolute wake times; `now` is latched once per poll.
    pub deadlines: DeadlineSet,

    // -- Sensors --
    pub monitor: SensorMonitor,
    /// Flags from the last sensor refresh.  Held constant in between.
    pub faults: FaultFlags,

    // -- Actuators --
    pub valve: ValveActuator,
    /// Fault that triggered the most recent close stroke.
    pub close_reason: Option<StationFault>,
    /// Set from power-up or wake until the fail-safe close stroke ends.
    pub starting_up: bool,
}

impl StationContext {
    /// Create a new context with the given configuration.
    pub fn new(config: StationConfig) -> Self {
        Self {
            deadlines: DeadlineSet::new(),
            monitor: SensorMonitor::new(&config),
            faults: FaultFlags::CLEAR,
            valve: ValveActuator::new(config.valve_timeout_ms),
            close_reason: None,
            starting_up: true,
            config,
        }
    }
}
