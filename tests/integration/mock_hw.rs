//! Mock installation for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history, and panics the moment an output combination that would
//! damage the plant is driven.

use std::cell::Cell;

use pumpstation::app::events::StationEvent;
use pumpstation::app::ports::{
    AlarmTone, Clock, EventSink, LeakSensor, PowerSensor, PumpOutput, StatusLed, StatusSink,
    ValveOutput,
};
use pumpstation::deadline::Millis;
use pumpstation::valve::ValveSubState;

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced clock.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

// ── Installation ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Pump(bool),
    OpenDrive(bool),
    CloseDrive(bool),
}

#[derive(Default)]
pub struct MockStation {
    // Inputs, set by the test.
    pub leak_analog: u16,
    pub leak_digital: bool,
    pub power_lost: bool,
    // Outputs, as last driven.
    pub pump: bool,
    pub open_drive: bool,
    pub close_drive: bool,
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_off(&self) -> bool {
        !self.pump && !self.open_drive && !self.close_drive
    }

    fn check_invariants(&self) {
        assert!(
            !(self.open_drive && self.close_drive),
            "open and close relays asserted together"
        );
        assert!(
            !(self.pump && (self.open_drive || self.close_drive)),
            "pump running during a valve stroke"
        );
    }
}

impl LeakSensor for MockStation {
    fn analog_reading(&mut self) -> u16 {
        self.leak_analog
    }

    fn digital_tripped(&mut self) -> bool {
        self.leak_digital
    }
}

impl PowerSensor for MockStation {
    fn tripped(&mut self) -> bool {
        self.power_lost
    }
}

impl PumpOutput for MockStation {
    fn set_pump(&mut self, on: bool) {
        self.pump = on;
        self.calls.push(OutputCall::Pump(on));
        self.check_invariants();
    }
}

impl ValveOutput for MockStation {
    fn set_open_drive(&mut self, on: bool) {
        self.open_drive = on;
        self.calls.push(OutputCall::OpenDrive(on));
        self.check_invariants();
    }

    fn set_close_drive(&mut self, on: bool) {
        self.close_drive = on;
        self.calls.push(OutputCall::CloseDrive(on));
        self.check_invariants();
    }
}

// ── Panel ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCall {
    Start,
    Stop,
    Report {
        leak: bool,
        power: bool,
        valve: ValveSubState,
    },
}

/// Records tone and report calls, plus timestamped tone and LED changes.
/// Tests set `now` before each poll.
#[derive(Default)]
pub struct MockPanel {
    pub now: Millis,
    pub calls: Vec<PanelCall>,
    pub sounding: bool,
    pub start_times: Vec<Millis>,
    pub stop_times: Vec<Millis>,
    pub led: bool,
    pub led_writes: Vec<(Millis, bool)>,
}

#[allow(dead_code)]
impl MockPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> usize {
        self.calls.iter().filter(|c| **c == PanelCall::Start).count()
    }

    pub fn stops(&self) -> usize {
        self.calls.iter().filter(|c| **c == PanelCall::Stop).count()
    }

    pub fn reports(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PanelCall::Report { .. }))
            .count()
    }

    /// Times at which the LED changed level.
    pub fn led_toggles(&self) -> Vec<Millis> {
        let mut level = false;
        let mut toggles = Vec::new();
        for &(t, on) in &self.led_writes {
            if on != level {
                toggles.push(t);
                level = on;
            }
        }
        toggles
    }

    pub fn last_report(&self) -> Option<PanelCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, PanelCall::Report { .. }))
            .copied()
    }
}

impl AlarmTone for MockPanel {
    fn start(&mut self) {
        self.sounding = true;
        self.calls.push(PanelCall::Start);
        self.start_times.push(self.now);
    }

    fn stop(&mut self) {
        self.sounding = false;
        self.calls.push(PanelCall::Stop);
        self.stop_times.push(self.now);
    }
}

impl StatusLed for MockPanel {
    fn set_led(&mut self, on: bool) {
        self.led = on;
        self.led_writes.push((self.now, on));
    }
}

impl StatusSink for MockPanel {
    fn report(&mut self, leak: bool, power: bool, valve: ValveSubState) {
        self.calls.push(PanelCall::Report { leak, power, valve });
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<StationEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &StationEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &StationEvent) {
        self.events.push(event.clone());
    }
}
