//! Port traits: the hexagonal boundary between the controller and the
//! installation.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! The controller holds no pin numbers and no voltage levels.  Adapters
//! (GPIO, ADC, beeper, console, message queue) implement these traits and
//! are injected at the call site of
//! [`StationService::poll`](super::service::StationService::poll).
//! Every method is infallible from the controller's point of view:
//! adapters resolve their own I/O errors fail-safe.

use crate::deadline::Millis;
use crate::valve::ValveSubState;

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond time source.
pub trait Clock {
    fn now(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Sensor ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Redundant leak sensor: an analog probe and a digital trip contact.
pub trait LeakSensor {
    /// Raw analog probe reading (ADC counts).
    fn analog_reading(&mut self) -> u16;

    /// `true` when the digital contact reports water.
    fn digital_tripped(&mut self) -> bool;
}

/// Mains supply health sensor.
pub trait PowerSensor {
    /// `true` when the supply is lost or degraded.  Any active-low wiring
    /// is already inverted by the adapter.
    fn tripped(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Pump relay.
pub trait PumpOutput {
    fn set_pump(&mut self, on: bool);
}

/// Motorized valve with separate open and close drive relays.
pub trait ValveOutput {
    fn set_open_drive(&mut self, on: bool);
    fn set_close_drive(&mut self, on: bool);
}

/// Everything the state machine touches on the installation side.
///
/// Blanket-implemented, so a single adapter struct implementing the four
/// ports can be passed as one `&mut` without a double borrow.
pub trait StationIo: LeakSensor + PowerSensor + PumpOutput + ValveOutput {}

impl<T: LeakSensor + PowerSensor + PumpOutput + ValveOutput + ?Sized> StationIo for T {}

// ───────────────────────────────────────────────────────────────
// Annunciation ports (domain → operator)
// ───────────────────────────────────────────────────────────────

/// Audible alarm generator.
pub trait AlarmTone {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Console / display / network status renderer.  Fire-and-forget.
pub trait StatusSink {
    fn report(&mut self, leak: bool, power: bool, valve: ValveSubState);
}

/// Single status indicator LED.
pub trait StatusLed {
    fn set_led(&mut self, on: bool);
}

/// Tone, status renderer and indicator LED, blanket-implemented like
/// [`StationIo`].
pub trait AlarmPanel: AlarmTone + StatusSink + StatusLed {}

impl<T: AlarmTone + StatusSink + StatusLed + ?Sized> AlarmPanel for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`StationEvent`](super::events::StationEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT,
/// etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::StationEvent);
}
