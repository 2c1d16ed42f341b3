//! Deadline manager: the only waiting primitive in the controller.
//!
//! Every "wait" is an absolute wake time stored per [`Timer`].  The
//! controller latches the clock once per poll with [`DeadlineSet::advance`],
//! then asks [`elapsed`](DeadlineSet::elapsed) instead of sleeping.
//!
//! Comparisons use a wrapped signed difference, so a deadline armed just
//! before the counter wraps still compares correctly just after it.

/// Milliseconds on the station's monotonic clock.
pub type Millis = u64;

/// The independent timers the controller schedules against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Timer {
    /// Sensor re-check, doubling as the valve stroke deadline.
    Check = 0,
    /// Status report cadence.
    Display = 1,
    /// Alarm tone repeat cadence.
    Alarm = 2,
    /// Status LED toggle.
    Blink = 3,
}

impl Timer {
    /// Total number of timers, used to size the slot array.
    pub const COUNT: usize = 4;
}

/// Absolute wake times, one slot per [`Timer`].
#[derive(Debug, Clone, Default)]
pub struct DeadlineSet {
    slots: [Option<Millis>; Timer::COUNT],
    now: Millis,
}

impl DeadlineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the current clock reading for this poll.
    pub fn advance(&mut self, now: Millis) {
        self.now = now;
    }

    /// The clock reading latched by the last [`advance`](Self::advance).
    pub fn now(&self) -> Millis {
        self.now
    }

    /// `true` once `now` has reached the timer's deadline.  A timer that
    /// was never armed is always elapsed.
    pub fn elapsed(&self, timer: Timer) -> bool {
        match self.slots[timer as usize] {
            None => true,
            Some(deadline) => (self.now.wrapping_sub(deadline) as i64) >= 0,
        }
    }

    /// Set the timer to fire `delay_ms` after the latched `now`.
    pub fn arm(&mut self, timer: Timer, delay_ms: Millis) {
        self.slots[timer as usize] = Some(self.now.wrapping_add(delay_ms));
    }

    /// Forget every armed deadline (used on wake).
    pub fn clear(&mut self) {
        self.slots = [None; Timer::COUNT];
    }
}
