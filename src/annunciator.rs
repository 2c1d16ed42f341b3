//! Alarm and status annunciation.
//!
//! Runs every poll after the state machine, but only acts when its own
//! deadlines allow it, so the operator-facing cadence is independent of
//! the control cadence.
//!
//! | Alarm deadline | Faults          | Tone action |
//! |----------------|-----------------|-------------|
//! | pending        | any             | nothing     |
//! | due            | active          | `start()`   |
//! | due            | clear, sounding | `stop()`    |
//! | due            | clear, quiet    | nothing     |
//!
//! Every tone action re-arms the alarm deadline, so the tone changes at
//! most once per alarm interval however often the fault flickers.  The
//! deadline starts unarmed, which makes the first alarm immediate.

use crate::app::ports::AlarmPanel;
use crate::deadline::{DeadlineSet, Millis, Timer};
use crate::monitor::FaultFlags;
use crate::valve::ValveSubState;

pub struct Annunciator {
    display_interval_ms: Millis,
    alarm_interval_ms: Millis,
    sounding: bool,
}

impl Annunciator {
    pub fn new(display_interval_ms: Millis, alarm_interval_ms: Millis) -> Self {
        Self {
            display_interval_ms,
            alarm_interval_ms,
            sounding: false,
        }
    }

    /// Report status and drive the tone according to the latched flags.
    pub fn update<P>(
        &mut self,
        faults: FaultFlags,
        valve: ValveSubState,
        deadlines: &mut DeadlineSet,
        panel: &mut P,
    ) where
        P: AlarmPanel + ?Sized,
    {
        if deadlines.elapsed(Timer::Display) {
            panel.report(faults.leak_detected, faults.power_fault, valve);
            deadlines.arm(Timer::Display, self.display_interval_ms);
        }

        if !deadlines.elapsed(Timer::Alarm) {
            return;
        }
        if faults.any() {
            panel.start();
            self.sounding = true;
        } else if self.sounding {
            panel.stop();
            self.sounding = false;
        } else {
            return;
        }
        deadlines.arm(Timer::Alarm, self.alarm_interval_ms);
    }

    /// Stop the tone unconditionally (entering suspend).
    pub fn silence<P>(&mut self, panel: &mut P)
    where
        P: AlarmPanel + ?Sized,
    {
        if self.sounding {
            panel.stop();
            self.sounding = false;
        }
    }

    /// Whether the tone is currently asserted.
    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}
