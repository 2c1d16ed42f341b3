//! Status LED indication.
//!
//! Maps the controller state onto a single LED so the station can be read
//! at a glance without a console:
//!
//! | Condition                                     | Pattern    |
//! |-----------------------------------------------|------------|
//! | `Suspended`                                   | off        |
//! | `Initializing`, or its fail-safe close stroke | steady on  |
//! | fault latched                                 | fast blink |
//! | `Monitoring` / `Transitioning`                | slow blink |
//!
//! Rows are checked top to bottom.
//!
//! Toggling runs on its own [`Timer::Blink`] deadline, so the blink rate
//! does not depend on how often the host polls.

use crate::app::ports::StatusLed;
use crate::deadline::{DeadlineSet, Millis, Timer};
use crate::fsm::ControlState;
use crate::monitor::FaultFlags;

/// What the LED is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPattern {
    Solid,
    SlowBlink,
    FastBlink,
    Off,
}

impl LedPattern {
    /// Pattern for a controller state and the latched flags.
    /// `starting_up` covers the close stroke issued by `Initializing`.
    pub fn select(state: ControlState, starting_up: bool, faults: FaultFlags) -> Self {
        match state {
            ControlState::Suspended => Self::Off,
            ControlState::Initializing => Self::Solid,
            _ if starting_up => Self::Solid,
            _ if faults.any() => Self::FastBlink,
            ControlState::Monitoring | ControlState::Transitioning => Self::SlowBlink,
        }
    }
}

pub struct Indicator {
    slow_blink_ms: Millis,
    fast_blink_ms: Millis,
    pattern: Option<LedPattern>,
    lit: bool,
}

impl Indicator {
    pub fn new(slow_blink_ms: Millis, fast_blink_ms: Millis) -> Self {
        Self {
            slow_blink_ms,
            fast_blink_ms,
            pattern: None,
            lit: false,
        }
    }

    /// Drive the LED for this poll.  A pattern change is applied at once;
    /// blinking patterns start lit.
    pub fn update<L>(
        &mut self,
        state: ControlState,
        starting_up: bool,
        faults: FaultFlags,
        deadlines: &mut DeadlineSet,
        led: &mut L,
    ) where
        L: StatusLed + ?Sized,
    {
        let pattern = LedPattern::select(state, starting_up, faults);

        if self.pattern != Some(pattern) {
            self.pattern = Some(pattern);
            self.drive(pattern != LedPattern::Off, led);
            if let Some(half) = self.half_period(pattern) {
                deadlines.arm(Timer::Blink, half);
            }
            return;
        }

        let Some(half) = self.half_period(pattern) else {
            return;
        };
        if deadlines.elapsed(Timer::Blink) {
            self.drive(!self.lit, led);
            deadlines.arm(Timer::Blink, half);
        }
    }

    /// Whether the LED is currently lit.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn half_period(&self, pattern: LedPattern) -> Option<Millis> {
        match pattern {
            LedPattern::SlowBlink => Some(self.slow_blink_ms),
            LedPattern::FastBlink => Some(self.fast_blink_ms),
            LedPattern::Solid | LedPattern::Off => None,
        }
    }

    fn drive<L: StatusLed + ?Sized>(&mut self, on: bool, led: &mut L) {
        led.set_led(on);
        self.lit = on;
    }
}
