//! Integration tests for the StationService → FSM → valve/pump pipeline.
//!
//! Drive the controller with a manual clock at a 100 ms host period and
//! check the installation-level behaviour: fail-safe start-up, interlocks,
//! fault response, and the suspend/wake cycle.

use crate::mock_hw::{ManualClock, MockPanel, MockStation, OutputCall, RecordingSink};

use pumpstation::app::events::StationEvent;
use pumpstation::app::ports::Clock;
use pumpstation::app::service::StationService;
use pumpstation::config::{
    CHECK_INTERVAL_MS, DEEP_FAULT_AFTER_MS, LEAK_ANALOG_THRESHOLD, StationConfig,
    VALVE_TRANSITION_TIMEOUT_MS,
};
use pumpstation::deadline::Millis;
use pumpstation::error::StationFault;
use pumpstation::fsm::ControlState;
use pumpstation::valve::ValveSubState;

const STEP_MS: Millis = 100;

struct Rig {
    station: StationService,
    clock: ManualClock,
    hw: MockStation,
    panel: MockPanel,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        Self {
            station: StationService::new(StationConfig::default()).unwrap(),
            clock: ManualClock::default(),
            hw: MockStation::new(),
            panel: MockPanel::new(),
            sink: RecordingSink::new(),
        }
    }

    fn poll(&mut self) {
        self.panel.now = self.clock.now();
        self.station
            .poll(&self.clock, &mut self.hw, &mut self.panel, &mut self.sink);
    }

    /// Poll every `STEP_MS` until the clock reaches `until` (inclusive).
    fn run_until(&mut self, until: Millis) {
        while self.clock.now() < until {
            self.poll();
            self.clock.advance(STEP_MS);
        }
        self.poll();
    }

    /// Poll until `done` holds, giving up after `limit` ms.
    fn run_while(&mut self, limit: Millis, mut done: impl FnMut(&Self) -> bool) -> Millis {
        let start = self.clock.now();
        while !done(self) {
            assert!(
                self.clock.now() - start <= limit,
                "condition not reached within {limit} ms (state {:?}, valve {:?})",
                self.station.state(),
                self.station.valve_state()
            );
            self.clock.advance(STEP_MS);
            self.poll();
        }
        self.clock.now() - start
    }

    /// Cold start with healthy sensors until the pump is running.
    fn bring_up(&mut self) {
        self.poll();
        self.run_while(2 * VALVE_TRANSITION_TIMEOUT_MS + 2 * CHECK_INTERVAL_MS, |r| {
            r.hw.pump
        });
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn cold_start_closes_valve_first() {
    let mut rig = Rig::new();
    rig.poll();

    assert_eq!(rig.station.state(), ControlState::Transitioning);
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);
    assert!(rig.hw.close_drive && !rig.hw.open_drive && !rig.hw.pump);
    assert_eq!(
        rig.sink.events[0],
        StationEvent::Started {
            state: ControlState::Initializing
        }
    );
    assert!(rig.sink.contains(&StationEvent::StateChanged {
        from: ControlState::Initializing,
        to: ControlState::Transitioning,
    }));
}

#[test]
fn cold_start_reaches_pumping_through_closed_and_opened() {
    let mut rig = Rig::new();
    rig.bring_up();

    assert_eq!(rig.station.state(), ControlState::Monitoring);
    assert_eq!(rig.station.valve_state(), ValveSubState::Opened);
    assert!(rig.hw.pump && !rig.hw.open_drive && !rig.hw.close_drive);

    let valve_path: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            StationEvent::ValveChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        valve_path,
        [
            ValveSubState::Closing,
            ValveSubState::Closed,
            ValveSubState::Opening,
            ValveSubState::Opened,
        ]
    );
}

#[test]
fn stroke_lasts_the_full_valve_timeout() {
    let mut rig = Rig::new();
    rig.run_until(VALVE_TRANSITION_TIMEOUT_MS - STEP_MS);
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);
    assert!(rig.hw.close_drive);

    rig.run_until(VALVE_TRANSITION_TIMEOUT_MS);
    assert_eq!(rig.station.valve_state(), ValveSubState::Closed);
    assert!(rig.hw.all_off());
}

// ── Interlocks ────────────────────────────────────────────────

#[test]
fn pump_is_switched_off_before_every_stroke() {
    let mut rig = Rig::new();
    rig.bring_up();
    rig.hw.calls.clear();

    rig.hw.leak_digital = true;
    rig.run_while(CHECK_INTERVAL_MS, |r| r.station.valve_state() == ValveSubState::Closing);

    assert_eq!(
        &rig.hw.calls[..3],
        [
            OutputCall::Pump(false),
            OutputCall::OpenDrive(false),
            OutputCall::CloseDrive(true),
        ]
    );
}

// ── Fault response ────────────────────────────────────────────

#[test]
fn analog_leak_closes_within_one_check_interval() {
    let mut rig = Rig::new();
    rig.bring_up();

    rig.hw.leak_analog = LEAK_ANALOG_THRESHOLD + 1;
    let took = rig.run_while(CHECK_INTERVAL_MS, |r| {
        r.station.state() == ControlState::Transitioning
    });

    assert!(took <= CHECK_INTERVAL_MS);
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);
    assert!(!rig.hw.pump);
    assert!(rig.sink.contains(&StationEvent::ValveChanged {
        from: ValveSubState::Opened,
        to: ValveSubState::Closing,
        reason: Some(StationFault::LeakDetected),
    }));
}

#[test]
fn analog_reading_at_threshold_is_not_a_leak() {
    let mut rig = Rig::new();
    rig.bring_up();

    rig.hw.leak_analog = LEAK_ANALOG_THRESHOLD;
    let t = rig.clock.now();
    rig.run_until(t + 5 * CHECK_INTERVAL_MS);

    assert!(!rig.station.faults().leak_detected);
    assert!(rig.hw.pump);
}

#[test]
fn digital_contact_alone_is_a_leak() {
    let mut rig = Rig::new();
    rig.bring_up();

    rig.hw.leak_digital = true;
    rig.run_while(CHECK_INTERVAL_MS, |r| r.station.faults().leak_detected);
    assert_eq!(rig.station.faults().primary(), Some(StationFault::LeakDetected));
}

#[test]
fn power_fault_takes_priority_as_close_reason() {
    let mut rig = Rig::new();
    rig.bring_up();

    rig.hw.leak_digital = true;
    rig.hw.power_lost = true;
    rig.run_while(CHECK_INTERVAL_MS, |r| r.station.valve_state() == ValveSubState::Closing);

    assert!(rig.sink.contains(&StationEvent::ValveChanged {
        from: ValveSubState::Opened,
        to: ValveSubState::Closing,
        reason: Some(StationFault::PowerFault),
    }));
}

#[test]
fn fault_during_stroke_waits_for_stroke_to_finish() {
    let mut rig = Rig::new();
    rig.poll();
    rig.run_while(VALVE_TRANSITION_TIMEOUT_MS + CHECK_INTERVAL_MS, |r| {
        r.station.valve_state() == ValveSubState::Opening
    });
    let opening_at = rig.clock.now();

    // Leak appears mid-stroke; the open stroke still runs to completion.
    rig.hw.leak_digital = true;
    rig.run_until(opening_at + VALVE_TRANSITION_TIMEOUT_MS - STEP_MS);
    assert_eq!(rig.station.valve_state(), ValveSubState::Opening);
    assert!(rig.hw.open_drive);

    rig.run_while(2 * CHECK_INTERVAL_MS, |r| r.station.valve_state() == ValveSubState::Closing);
    assert!(
        !rig.hw.calls.contains(&OutputCall::Pump(true)),
        "pump must never run while the leak is present"
    );
}

#[test]
fn recovery_reopens_and_restarts_pump() {
    let mut rig = Rig::new();
    rig.bring_up();

    rig.hw.leak_digital = true;
    rig.run_while(CHECK_INTERVAL_MS, |r| r.station.valve_state() == ValveSubState::Closing);
    rig.hw.leak_digital = false;

    rig.run_while(2 * VALVE_TRANSITION_TIMEOUT_MS + 2 * CHECK_INTERVAL_MS, |r| r.hw.pump);
    assert_eq!(rig.station.valve_state(), ValveSubState::Opened);
    assert!(rig.sink.contains(&StationEvent::FaultCleared));
}

// ── Suspend / wake ────────────────────────────────────────────

#[test]
fn persistent_power_loss_suspends_with_outputs_off() {
    let mut rig = Rig::new();
    rig.hw.power_lost = true;
    rig.poll();

    rig.run_while(VALVE_TRANSITION_TIMEOUT_MS + DEEP_FAULT_AFTER_MS + CHECK_INTERVAL_MS, |r| {
        r.station.is_suspended()
    });

    assert_eq!(rig.station.valve_state(), ValveSubState::Closed);
    assert!(rig.hw.all_off());
    assert!(!rig.panel.sounding);
    assert!(!rig.panel.led);
    assert!(rig.sink.contains(&StationEvent::Suspended));

    // Nothing is driven while parked.
    let hw_calls = rig.hw.calls.len();
    let panel_calls = rig.panel.calls.len();
    let led_writes = rig.panel.led_writes.len();
    let t = rig.clock.now();
    rig.run_until(t + 60_000);
    assert_eq!(rig.hw.calls.len(), hw_calls);
    assert_eq!(rig.panel.calls.len(), panel_calls);
    assert_eq!(rig.panel.led_writes.len(), led_writes);
}

#[test]
fn short_power_loss_does_not_suspend() {
    let mut rig = Rig::new();
    rig.bring_up();

    rig.hw.power_lost = true;
    let t = rig.clock.now();
    rig.run_until(t + DEEP_FAULT_AFTER_MS / 2);
    rig.hw.power_lost = false;
    rig.run_until(t + 2 * DEEP_FAULT_AFTER_MS);

    assert!(!rig.station.is_suspended());
    assert!(rig.hw.pump);
}

#[test]
fn wake_reinitializes_from_scratch() {
    let mut rig = Rig::new();
    rig.hw.power_lost = true;
    rig.poll();
    rig.run_while(VALVE_TRANSITION_TIMEOUT_MS + DEEP_FAULT_AFTER_MS + CHECK_INTERVAL_MS, |r| {
        r.station.is_suspended()
    });

    rig.hw.power_lost = false;
    rig.station.wake(&mut rig.hw, &mut rig.sink);
    assert_eq!(rig.station.state(), ControlState::Initializing);
    assert!(!rig.station.faults().any());
    assert!(rig.sink.contains(&StationEvent::Woken));

    rig.clock.advance(STEP_MS);
    rig.poll();
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);

    rig.run_while(2 * VALVE_TRANSITION_TIMEOUT_MS + 2 * CHECK_INTERVAL_MS, |r| r.hw.pump);
}

#[test]
fn wake_while_pumping_stops_pump_and_recloses() {
    let mut rig = Rig::new();
    rig.bring_up();
    assert_eq!(rig.station.state(), ControlState::Monitoring);
    rig.hw.calls.clear();

    rig.station.wake(&mut rig.hw, &mut rig.sink);
    assert!(rig.hw.all_off(), "wake releases every output");
    assert_eq!(rig.hw.calls[0], OutputCall::Pump(false));
    assert_eq!(rig.station.state(), ControlState::Initializing);

    rig.clock.advance(STEP_MS);
    rig.poll();
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);
    assert!(rig.hw.close_drive && !rig.hw.open_drive && !rig.hw.pump);

    rig.run_while(2 * VALVE_TRANSITION_TIMEOUT_MS + 2 * CHECK_INTERVAL_MS, |r| r.hw.pump);
}

#[test]
fn wake_mid_stroke_releases_drive_and_recloses() {
    let mut rig = Rig::new();
    rig.poll();
    rig.run_while(VALVE_TRANSITION_TIMEOUT_MS + CHECK_INTERVAL_MS, |r| {
        r.station.valve_state() == ValveSubState::Opening
    });
    let t = rig.clock.now();
    rig.run_until(t + VALVE_TRANSITION_TIMEOUT_MS / 2);
    assert_eq!(rig.station.state(), ControlState::Transitioning);
    assert!(rig.hw.open_drive);

    rig.station.wake(&mut rig.hw, &mut rig.sink);
    assert!(!rig.hw.open_drive);
    assert!(rig.hw.all_off());

    rig.clock.advance(STEP_MS);
    rig.poll();
    let closing_at = rig.clock.now();
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);
    assert!(rig.hw.close_drive && !rig.hw.open_drive && !rig.hw.pump);
    assert!(rig.sink.contains(&StationEvent::ValveChanged {
        from: ValveSubState::Opening,
        to: ValveSubState::Closing,
        reason: None,
    }));

    // The new close stroke gets the full timeout from the wake.
    rig.run_until(closing_at + VALVE_TRANSITION_TIMEOUT_MS - STEP_MS);
    assert_eq!(rig.station.valve_state(), ValveSubState::Closing);
    rig.run_until(closing_at + VALVE_TRANSITION_TIMEOUT_MS);
    assert_eq!(rig.station.valve_state(), ValveSubState::Closed);
}
