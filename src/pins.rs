//! GPIO / peripheral pin assignments for the pump station board.
//!
//! Every adapter is wired from these constants in `main()`; nothing else
//! hard-codes a pin number.

// ---------------------------------------------------------------------------
// Leak probe
// ---------------------------------------------------------------------------

/// Analog leak probe on ADC1.  GPIO 4 on the ESP32-S3 is ADC1 channel 3.
pub const LEAK_ADC_GPIO: i32 = 4;
pub const LEAK_ADC_CHANNEL: u32 = 3;

/// Digital leak contact.  HIGH = water on the floor.
pub const LEAK_DIGITAL_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Supply monitor
// ---------------------------------------------------------------------------

/// Mains-present opto input.  Held HIGH while supply is healthy.
pub const POWER_SENSE_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Outputs (SSR relays, active HIGH)
// ---------------------------------------------------------------------------

pub const PUMP_RELAY_GPIO: i32 = 10;
pub const VALVE_OPEN_RELAY_GPIO: i32 = 11;
pub const VALVE_CLOSE_RELAY_GPIO: i32 = 12;

/// Piezo buzzer driver.
pub const BEEPER_GPIO: i32 = 13;

/// Status indicator LED, active HIGH.
pub const STATUS_LED_GPIO: i32 = 14;
