//! Station service: the hexagonal core.
//!
//! [`StationService`] owns the FSM, its shared context, the annunciator
//! and the status LED indicator.  The host calls [`poll`](StationService::poll) in a loop;
//! every call returns promptly, and all waiting is expressed through the
//! deadline set.
//!
//! ```text
//!  Clock ─────────▶ ┌───────────────────────────┐ ──▶ EventSink
//!  StationIo ◀────▶ │      StationService       │
//!                   │  Deadlines · FSM · Valve  │ ──▶ AlarmPanel
//!                   └───────────────────────────┘
//! ```

use log::info;

use crate::annunciator::Annunciator;
use crate::config::StationConfig;
use crate::error::Error;
use crate::fsm::context::StationContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{ControlState, Fsm};
use crate::indicator::Indicator;
use crate::monitor::FaultFlags;
use crate::valve::ValveSubState;

use super::events::{StationEvent, StationStatus};
use super::ports::{AlarmPanel, Clock, EventSink, StationIo};

// ───────────────────────────────────────────────────────────────
// StationService
// ───────────────────────────────────────────────────────────────

pub struct StationService {
    fsm: Fsm,
    ctx: StationContext,
    annunciator: Annunciator,
    indicator: Indicator,
    started: bool,
    poll_count: u64,
}

impl StationService {
    /// Construct the controller in `Initializing` with the valve assumed
    /// closed.  Nothing is driven until the first [`poll`](Self::poll).
    pub fn new(config: StationConfig) -> Result<Self, Error> {
        config.validate()?;
        let annunciator = Annunciator::new(config.display_interval_ms, config.alarm_interval_ms);
        let indicator = Indicator::new(config.slow_blink_ms, config.fast_blink_ms);
        Ok(Self {
            fsm: Fsm::new(build_state_table(), ControlState::Initializing),
            ctx: StationContext::new(config),
            annunciator,
            indicator,
            started: false,
            poll_count: 0,
        })
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one control cycle: latch time → state machine → annunciation
    /// → status LED.
    ///
    /// `hw` satisfies all four installation ports at once, which avoids a
    /// double mutable borrow while keeping the port boundary explicit.
    pub fn poll(
        &mut self,
        clock: &impl Clock,
        hw: &mut impl StationIo,
        panel: &mut impl AlarmPanel,
        sink: &mut impl EventSink,
    ) {
        self.poll_count = self.poll_count.wrapping_add(1);
        self.ctx.deadlines.advance(clock.now());

        if !self.started {
            self.started = true;
            sink.emit(&StationEvent::Started {
                state: self.fsm.current_state(),
            });
            info!("StationService started in {:?}", self.fsm.current_state());
        }

        let prev_state = self.fsm.current_state();
        let prev_valve = self.ctx.valve.state();
        let prev_faults = self.ctx.faults;

        self.fsm.tick(&mut self.ctx, hw);

        self.emit_changes(prev_state, prev_valve, prev_faults, panel, sink);

        if self.fsm.current_state() != ControlState::Suspended {
            self.annunciator.update(
                self.ctx.faults,
                self.ctx.valve.state(),
                &mut self.ctx.deadlines,
                panel,
            );
        }

        self.indicator.update(
            self.fsm.current_state(),
            self.ctx.starting_up,
            self.ctx.faults,
            &mut self.ctx.deadlines,
            panel,
        );
    }

    /// Restart from `Initializing`, e.g. after the host slept or a wake
    /// interrupt fired.  Nothing survives a sleep: latched flags and
    /// deadlines are discarded and the valve is driven closed again.
    ///
    /// Callable from any state.  The pump and both valve relays are
    /// released at once, so a wake in the middle of a stroke or while
    /// pumping never leaves an output driven.
    pub fn wake(&mut self, hw: &mut impl StationIo, sink: &mut impl EventSink) {
        let from = self.fsm.current_state();
        self.ctx.valve.all_off(hw);
        self.ctx.monitor.reset();
        self.ctx.faults = FaultFlags::CLEAR;
        self.ctx.close_reason = None;
        self.ctx.deadlines.clear();
        self.fsm
            .force_transition(ControlState::Initializing, &mut self.ctx, hw);
        sink.emit(&StationEvent::Woken);
        info!(
            "StationService woken from {:?} after {} polls, re-initializing",
            from, self.poll_count
        );
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current controller state.
    pub fn state(&self) -> ControlState {
        self.fsm.current_state()
    }

    /// Current valve sub-state.
    pub fn valve_state(&self) -> ValveSubState {
        self.ctx.valve.state()
    }

    /// Flags from the last sensor refresh.
    pub fn faults(&self) -> FaultFlags {
        self.ctx.faults
    }

    /// Whether the host may put the device to sleep.
    pub fn is_suspended(&self) -> bool {
        self.fsm.current_state() == ControlState::Suspended
    }

    /// Snapshot for telemetry.
    pub fn status(&self) -> StationStatus {
        StationStatus {
            state: self.fsm.current_state(),
            valve: self.ctx.valve.state(),
            relays: self.ctx.valve.relays(),
            faults: self.ctx.faults,
            alarm_sounding: self.annunciator.is_sounding(),
            led_lit: self.indicator.is_lit(),
            polls: self.poll_count,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &StationConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_changes(
        &mut self,
        prev_state: ControlState,
        prev_valve: ValveSubState,
        prev_faults: FaultFlags,
        panel: &mut impl AlarmPanel,
        sink: &mut impl EventSink,
    ) {
        let faults = self.ctx.faults;
        if faults != prev_faults {
            if faults.any() {
                sink.emit(&StationEvent::FaultDetected { faults });
            } else {
                sink.emit(&StationEvent::FaultCleared);
            }
        }

        let valve = self.ctx.valve.state();
        if valve != prev_valve {
            let reason = if valve == ValveSubState::Closing {
                self.ctx.close_reason
            } else {
                None
            };
            sink.emit(&StationEvent::ValveChanged {
                from: prev_valve,
                to: valve,
                reason,
            });
        }

        let state = self.fsm.current_state();
        if state != prev_state {
            sink.emit(&StationEvent::StateChanged {
                from: prev_state,
                to: state,
            });
            if state == ControlState::Suspended {
                self.annunciator.silence(panel);
                sink.emit(&StationEvent::Suspended);
            }
        }
    }
}
