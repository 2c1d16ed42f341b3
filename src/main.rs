//! Pump station firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter     PanelAdapter      LogEventSink        │
//! │  (StationIo)         (AlarmPanel)      (EventSink)         │
//! │  SystemClock                                               │
//! │  (Clock)                                                   │
//! │                                                            │
//! │  ───────────────── Port Trait Boundary ─────────────────   │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │             StationService (pure logic)              │  │
//! │  │  Deadlines · Monitor · Valve · FSM · Annunciator     │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use log::{info, warn};

use pumpstation::adapters::adc::OneshotAdc;
use pumpstation::adapters::hal::{GpioLeakSensor, GpioPowerSensor, GpioRelay, GpioValve, Polarity};
use pumpstation::adapters::hardware::{HardwareAdapter, PanelAdapter};
use pumpstation::adapters::log_sink::{LogEventSink, LogStatusSink};
use pumpstation::adapters::time::SystemClock;
use pumpstation::app::service::StationService;
use pumpstation::config::StationConfig;
use pumpstation::pins;

/// Host loop period.  Well below every controller interval so deadlines
/// are observed within one period of expiring.
const POLL_PERIOD_MS: u32 = 50;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Pump station v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    // SAFETY: each GPIO number in `pins` is claimed exactly once here and
    // nothing else in the firmware touches the GPIO matrix.
    let (leak_pin, power_pin, pump_pin, open_pin, close_pin, beeper_pin, led_pin) = unsafe {
        (
            AnyIOPin::new(pins::LEAK_DIGITAL_GPIO),
            AnyIOPin::new(pins::POWER_SENSE_GPIO),
            AnyOutputPin::new(pins::PUMP_RELAY_GPIO),
            AnyOutputPin::new(pins::VALVE_OPEN_RELAY_GPIO),
            AnyOutputPin::new(pins::VALVE_CLOSE_RELAY_GPIO),
            AnyOutputPin::new(pins::BEEPER_GPIO),
            AnyOutputPin::new(pins::STATUS_LED_GPIO),
        )
    };

    let mut leak_contact = PinDriver::input(leak_pin)?;
    leak_contact.set_pull(Pull::Down)?;
    let mut power_sense = PinDriver::input(power_pin)?;
    power_sense.set_pull(Pull::Down)?;

    let adc = OneshotAdc::new(pins::LEAK_ADC_CHANNEL)?;

    let mut hw = HardwareAdapter::new(
        GpioLeakSensor::new(adc, leak_contact, Polarity::ActiveHigh),
        // Supply-present line: low means the supply has failed.
        GpioPowerSensor::new(power_sense, Polarity::ActiveLow),
        GpioRelay::new(PinDriver::output(pump_pin)?, Polarity::ActiveHigh, "pump"),
        GpioValve::new(
            GpioRelay::new(PinDriver::output(open_pin)?, Polarity::ActiveHigh, "valve open"),
            GpioRelay::new(PinDriver::output(close_pin)?, Polarity::ActiveHigh, "valve close"),
        ),
    );
    let mut panel = PanelAdapter::new(
        GpioRelay::new(PinDriver::output(beeper_pin)?, Polarity::ActiveHigh, "beeper"),
        LogStatusSink::new(),
        GpioRelay::new(PinDriver::output(led_pin)?, Polarity::ActiveHigh, "status led"),
    );
    let mut sink = LogEventSink::new();
    let clock = SystemClock::new();

    // ── 3. Controller ─────────────────────────────────────────
    let mut station = StationService::new(StationConfig::default())?;
    match serde_json::to_string(station.config()) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config encode failed: {}", e),
    }

    info!("System ready. Entering poll loop.");

    // ── 4. Poll loop ──────────────────────────────────────────
    loop {
        if station.is_suspended() {
            // Outputs are already off.  Resume only once the supply is back.
            if hw.power_present() {
                station.wake(&mut hw, &mut sink);
            }
        } else {
            station.poll(&clock, &mut hw, &mut panel, &mut sink);
        }

        FreeRtos::delay_ms(POLL_PERIOD_MS);
    }
}
