//! Fixed-capacity status line for the console / character display.
//!
//! Rendered into a `heapless::String` so the display path never
//! allocates.  Format:
//!
//! ```text
//! LEAK:ok PWR:ok VALVE:opened
//! LEAK:ALARM PWR:ok VALVE:closing
//! ```

use core::fmt::Write;

use heapless::String;

use crate::valve::ValveSubState;

/// Capacity of a rendered status line.
pub const STATUS_LINE_CAP: usize = 48;

/// Render one status line.
pub fn render_status_line(
    leak: bool,
    power: bool,
    valve: ValveSubState,
) -> String<STATUS_LINE_CAP> {
    let mut line = String::new();
    // Longest possible line is well under capacity.
    let _ = write!(
        line,
        "LEAK:{} PWR:{} VALVE:{}",
        flag(leak),
        flag(power),
        valve.label()
    );
    line
}

fn flag(active: bool) -> &'static str {
    if active { "ALARM" } else { "ok" }
}
