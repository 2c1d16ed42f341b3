//! Valve and pump actuator controller.
//!
//! The fill valve is a motorized ball valve driven by two solid-state
//! relays: one powers the motor toward *open*, the other toward *close*.
//! The valve stops on its own at either end-stop, so holding power is
//! never needed once a stroke has finished.
//!
//! ## Safety contract
//!
//! - The two drive relays are never asserted together.  Every write
//!   de-asserts the opposing relay before asserting the wanted one.
//! - The pump is switched off before any stroke begins and only switched
//!   back on from [`ValveSubState::Opened`].
//! - There is no position feedback.  A stroke is given
//!   `valve_timeout_ms`; when the controller observes that deadline it
//!   calls [`ValveActuator::finalize_transition`], which cuts both relays
//!   and *assumes* the end-stop was reached.  A stuck valve is therefore
//!   indistinguishable from a finished one.
//!
//! ```text
//!  Closed ──request_open──▶ Opening ──finalize──▶ Opened
//!    ▲                                              │
//!    └──finalize── Closing ◀──request_close─────────┘
//! ```

use log::info;
use serde::Serialize;

use crate::app::ports::{PumpOutput, ValveOutput};
use crate::deadline::{DeadlineSet, Millis, Timer};

/// Physical position/motion phase of the valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValveSubState {
    Opening,
    Opened,
    Closing,
    Closed,
}

impl ValveSubState {
    /// `true` while a stroke is in progress.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Opened => "opened",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

/// Last levels commanded on the relay outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelayState {
    pub open_drive: bool,
    pub close_drive: bool,
    pub pump: bool,
}

/// Drives the pump and valve relays and tracks the valve sub-state.
pub struct ValveActuator {
    state: ValveSubState,
    relays: RelayState,
    timeout_ms: Millis,
}

impl ValveActuator {
    /// Starts assuming the fail-safe position: closed, everything off.
    pub fn new(timeout_ms: Millis) -> Self {
        Self {
            state: ValveSubState::Closed,
            relays: RelayState::default(),
            timeout_ms,
        }
    }

    /// Begin an open stroke.  Returns `false` (and touches nothing) if the
    /// valve is already open or mid-stroke.
    pub fn request_open<O>(&mut self, hw: &mut O, deadlines: &mut DeadlineSet) -> bool
    where
        O: PumpOutput + ValveOutput + ?Sized,
    {
        if self.state != ValveSubState::Closed {
            return false;
        }
        self.begin_stroke(ValveSubState::Opening, hw, deadlines);
        true
    }

    /// Begin a close stroke.  Returns `false` (and touches nothing) if the
    /// valve is already closed or mid-stroke.
    pub fn request_close<O>(&mut self, hw: &mut O, deadlines: &mut DeadlineSet) -> bool
    where
        O: PumpOutput + ValveOutput + ?Sized,
    {
        if self.state != ValveSubState::Opened {
            return false;
        }
        self.begin_stroke(ValveSubState::Closing, hw, deadlines);
        true
    }

    /// End the current stroke: both relays off, sub-state advanced to the
    /// stroke's target.  No-op when the valve is not moving.
    pub fn finalize_transition<O>(&mut self, hw: &mut O)
    where
        O: PumpOutput + ValveOutput + ?Sized,
    {
        let settled = match self.state {
            ValveSubState::Opening => ValveSubState::Opened,
            ValveSubState::Closing => ValveSubState::Closed,
            ValveSubState::Opened | ValveSubState::Closed => return,
        };
        self.drive(hw, false, false);
        info!("VALVE: {} -> {}", self.state.label(), settled.label());
        self.state = settled;
    }

    /// Run the pump if, and only if, the valve is fully open.
    pub fn resume_pump_if_open<O>(&mut self, hw: &mut O)
    where
        O: PumpOutput + ?Sized,
    {
        if self.state == ValveSubState::Opened && !self.relays.pump {
            hw.set_pump(true);
            self.relays.pump = true;
            info!("PUMP: on");
        }
    }

    /// Overwrite the assumed position without moving anything.
    ///
    /// Start-up uses this to assume the valve may be open, so the close
    /// stroke that follows is always accepted whatever the real position.
    pub fn assume(&mut self, state: ValveSubState) {
        self.state = state;
    }

    /// Pump and both relays off, regardless of sub-state.
    pub fn all_off<O>(&mut self, hw: &mut O)
    where
        O: PumpOutput + ValveOutput + ?Sized,
    {
        self.pump_off(hw);
        self.drive(hw, false, false);
    }

    pub fn state(&self) -> ValveSubState {
        self.state
    }

    pub fn relays(&self) -> RelayState {
        self.relays
    }

    pub fn pump_on(&self) -> bool {
        self.relays.pump
    }

    // ── Internal ──────────────────────────────────────────────────

    fn begin_stroke<O>(&mut self, target: ValveSubState, hw: &mut O, deadlines: &mut DeadlineSet)
    where
        O: PumpOutput + ValveOutput + ?Sized,
    {
        self.pump_off(hw);
        let opening = target == ValveSubState::Opening;
        self.drive(hw, opening, !opening);
        info!(
            "VALVE: {} -> {} (timeout {} ms)",
            self.state.label(),
            target.label(),
            self.timeout_ms
        );
        self.state = target;
        deadlines.arm(Timer::Check, self.timeout_ms);
    }

    fn pump_off<O>(&mut self, hw: &mut O)
    where
        O: PumpOutput + ?Sized,
    {
        hw.set_pump(false);
        if self.relays.pump {
            info!("PUMP: off");
        }
        self.relays.pump = false;
    }

    /// Write both relays, releasing before asserting (break-before-make).
    fn drive<O>(&mut self, hw: &mut O, open: bool, close: bool)
    where
        O: ValveOutput + ?Sized,
    {
        debug_assert!(!(open && close));
        if !open {
            hw.set_open_drive(false);
        }
        if !close {
            hw.set_close_drive(false);
        }
        if open {
            hw.set_open_drive(true);
        }
        if close {
            hw.set_close_drive(true);
        }
        self.relays.open_drive = open;
        self.relays.close_drive = close;
    }
}
