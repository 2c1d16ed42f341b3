//! Hardware adapter: bundles the individual peripherals behind the
//! controller's port traits.
//!
//! [`HardwareAdapter`] owns the two sensors and two actuators and exposes
//! them as one [`StationIo`](crate::app::ports::StationIo) value;
//! [`PanelAdapter`] does the same for the tone generator, status
//! renderer and indicator LED.  Both are generic, so the same wiring works for GPIO
//! adapters on target and for simulated peripherals on the host.

use crate::app::ports::{
    AlarmTone, LeakSensor, PowerSensor, PumpOutput, StatusLed, StatusSink, ValveOutput,
};
use crate::valve::ValveSubState;

/// Concrete adapter that combines all installation I/O.
pub struct HardwareAdapter<L, W, P, V> {
    leak: L,
    power: W,
    pump: P,
    valve: V,
}

impl<L, W, P, V> HardwareAdapter<L, W, P, V>
where
    L: LeakSensor,
    W: PowerSensor,
    P: PumpOutput,
    V: ValveOutput,
{
    pub fn new(leak: L, power: W, pump: P, valve: V) -> Self {
        Self {
            leak,
            power,
            pump,
            valve,
        }
    }

    /// Re-read the supply input outside the controller, e.g. while the
    /// station is suspended and the host is deciding whether to wake.
    pub fn power_present(&mut self) -> bool {
        !self.power.tripped()
    }
}

// ── Sensor ports ──────────────────────────────────────────────

impl<L: LeakSensor, W, P, V> LeakSensor for HardwareAdapter<L, W, P, V> {
    fn analog_reading(&mut self) -> u16 {
        self.leak.analog_reading()
    }

    fn digital_tripped(&mut self) -> bool {
        self.leak.digital_tripped()
    }
}

impl<L, W: PowerSensor, P, V> PowerSensor for HardwareAdapter<L, W, P, V> {
    fn tripped(&mut self) -> bool {
        self.power.tripped()
    }
}

// ── Actuator ports ────────────────────────────────────────────

impl<L, W, P: PumpOutput, V> PumpOutput for HardwareAdapter<L, W, P, V> {
    fn set_pump(&mut self, on: bool) {
        self.pump.set_pump(on);
    }
}

impl<L, W, P, V: ValveOutput> ValveOutput for HardwareAdapter<L, W, P, V> {
    fn set_open_drive(&mut self, on: bool) {
        self.valve.set_open_drive(on);
    }

    fn set_close_drive(&mut self, on: bool) {
        self.valve.set_close_drive(on);
    }
}

/// Tone generator, status renderer and indicator LED.
pub struct PanelAdapter<T, S, L> {
    tone: T,
    status: S,
    led: L,
}

impl<T: AlarmTone, S: StatusSink, L: StatusLed> PanelAdapter<T, S, L> {
    pub fn new(tone: T, status: S, led: L) -> Self {
        Self { tone, status, led }
    }
}

impl<T: AlarmTone, S, L> AlarmTone for PanelAdapter<T, S, L> {
    fn start(&mut self) {
        self.tone.start();
    }

    fn stop(&mut self) {
        self.tone.stop();
    }
}

impl<T, S: StatusSink, L> StatusSink for PanelAdapter<T, S, L> {
    fn report(&mut self, leak: bool, power: bool, valve: ValveSubState) {
        self.status.report(leak, power, valve);
    }
}

impl<T, S, L: StatusLed> StatusLed for PanelAdapter<T, S, L> {
    fn set_led(&mut self, on: bool) {
        self.led.set_led(on);
    }
}
