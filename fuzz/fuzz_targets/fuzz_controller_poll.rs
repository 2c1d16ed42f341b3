//! Fuzz target: `StationService::poll`
//!
//! Interprets the input as a sequence of 4-byte host periods (time step,
//! analog reading, flag bits) and drives the controller through them.
//! Asserts that the valve relays are never asserted together and that the
//! pump only runs with the valve fully open, whatever the sensors report
//! and however irregular (or wrapping) the clock is.
//!
//! cargo fuzz run fuzz_controller_poll

#![no_main]

use std::cell::Cell;

use libfuzzer_sys::fuzz_target;
use pumpstation::app::events::StationEvent;
use pumpstation::app::ports::{
    AlarmTone, Clock, EventSink, LeakSensor, PowerSensor, PumpOutput, StatusLed, StatusSink,
    ValveOutput,
};
use pumpstation::app::service::StationService;
use pumpstation::config::StationConfig;
use pumpstation::deadline::Millis;
use pumpstation::valve::ValveSubState;

struct Clk(Cell<Millis>);

impl Clock for Clk {
    fn now(&self) -> Millis {
        self.0.get()
    }
}

#[derive(Default)]
struct Plant {
    analog: u16,
    digital: bool,
    power_lost: bool,
    pump: bool,
    open: bool,
    close: bool,
}

impl Plant {
    fn check(&self) {
        assert!(!(self.open && self.close), "both valve relays asserted");
        assert!(!(self.pump && (self.open || self.close)), "pump ran during stroke");
    }
}

impl LeakSensor for Plant {
    fn analog_reading(&mut self) -> u16 {
        self.analog
    }
    fn digital_tripped(&mut self) -> bool {
        self.digital
    }
}

impl PowerSensor for Plant {
    fn tripped(&mut self) -> bool {
        self.power_lost
    }
}

impl PumpOutput for Plant {
    fn set_pump(&mut self, on: bool) {
        self.pump = on;
        self.check();
    }
}

impl ValveOutput for Plant {
    fn set_open_drive(&mut self, on: bool) {
        self.open = on;
        self.check();
    }
    fn set_close_drive(&mut self, on: bool) {
        self.close = on;
        self.check();
    }
}

struct Quiet;

impl AlarmTone for Quiet {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

impl StatusSink for Quiet {
    fn report(&mut self, _leak: bool, _power: bool, _valve: ValveSubState) {}
}

impl StatusLed for Quiet {
    fn set_led(&mut self, _on: bool) {}
}

impl EventSink for Quiet {
    fn emit(&mut self, _event: &StationEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut station) = StationService::new(StationConfig::default()) else {
        return;
    };
    // Start near the top of the counter so long inputs exercise wraparound.
    let clock = Clk(Cell::new(u64::MAX - 60_000));
    let mut plant = Plant::default();
    let mut panel = Quiet;
    let mut sink = Quiet;

    for chunk in data.chunks_exact(4) {
        let dt = u64::from(chunk[0]) * 64;
        plant.analog = u16::from_le_bytes([chunk[1], chunk[2] & 0x0F]);
        plant.digital = chunk[3] & 0x01 != 0;
        plant.power_lost = chunk[3] & 0x02 != 0;
        clock.0.set(clock.0.get().wrapping_add(dt));

        if chunk[3] & 0x80 != 0 && station.is_suspended() {
            station.wake(&mut plant, &mut sink);
        } else {
            station.poll(&clock, &mut plant, &mut panel, &mut sink);
        }

        if plant.pump {
            assert_eq!(station.valve_state(), ValveSubState::Opened);
        }
    }
});
