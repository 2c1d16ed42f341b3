//! Unified error types for the pump station firmware.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can be passed through the control loop without
//! allocation.  None of them drive control flow: the state machine reacts
//! to fault *flags*, and these types only describe what went wrong for
//! logging and for configuration checks.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor input could not be read.
    Sensor(SensorError),
    /// An actuator output could not be driven.
    Actuator(ActuatorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC conversion failed.
    AdcReadFailed,
    /// GPIO level read failed.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Station faults
// ---------------------------------------------------------------------------

/// Conditions that force the valve closed.
///
/// `LeakDetected` and `PowerFault` are recoverable and clear on their own
/// once the sensor reports healthy.  `DeepFault` parks the station in
/// `Suspended` until an external wake.  A valve stroke that outlives its
/// timeout is deliberately *not* a fault: the stroke is assumed complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationFault {
    /// Water detected outside the tank.
    LeakDetected,
    /// Mains supply lost or degraded.
    PowerFault,
    /// Power fault persisted beyond the deep-fault threshold.
    DeepFault,
}

impl fmt::Display for StationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeakDetected => write!(f, "water leak detected"),
            Self::PowerFault => write!(f, "power supply fault"),
            Self::DeepFault => write!(f, "persistent power loss"),
        }
    }
}
