//! GPIO adapters over the `embedded-hal` 1.0 digital traits.
//!
//! Each adapter wraps one physical input or output and implements the
//! matching port trait.  Pin errors never reach the controller: they are
//! logged and resolved fail-safe.
//!
//! | Failure                 | Resolution                       |
//! |-------------------------|----------------------------------|
//! | leak input read fails   | report a leak                    |
//! | power input read fails  | report a power fault             |
//! | ADC sample fails        | report full scale (a leak)       |
//! | output write fails      | logged; next write retries level |

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::warn;

use crate::app::ports::{AlarmTone, LeakSensor, PowerSensor, PumpOutput, StatusLed, ValveOutput};
use crate::error::{ActuatorError, Error, SensorError};

/// Electrical level that means "tripped" / "energised".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    fn is_active(self, high: bool) -> bool {
        match self {
            Self::ActiveHigh => high,
            Self::ActiveLow => !high,
        }
    }

    fn level(self, active: bool) -> PinState {
        PinState::from(self.is_active(active))
    }
}

/// One-shot ADC channel.  `embedded-hal` 1.0 has no ADC trait, so the
/// board wiring supplies this.
pub trait AnalogChannel {
    fn sample(&mut self) -> Result<u16, SensorError>;
}

impl<F: FnMut() -> Result<u16, SensorError>> AnalogChannel for F {
    fn sample(&mut self) -> Result<u16, SensorError> {
        self()
    }
}

// ── Inputs ────────────────────────────────────────────────────

/// Leak probe: analog channel plus digital trip contact.
pub struct GpioLeakSensor<A, D> {
    analog: A,
    digital: D,
    polarity: Polarity,
}

impl<A: AnalogChannel, D: InputPin> GpioLeakSensor<A, D> {
    pub fn new(analog: A, digital: D, polarity: Polarity) -> Self {
        Self {
            analog,
            digital,
            polarity,
        }
    }
}

impl<A: AnalogChannel, D: InputPin> LeakSensor for GpioLeakSensor<A, D> {
    fn analog_reading(&mut self) -> u16 {
        self.analog.sample().unwrap_or_else(|e| {
            warn!("leak probe: {}", Error::from(e));
            u16::MAX
        })
    }

    fn digital_tripped(&mut self) -> bool {
        match self.digital.is_high() {
            Ok(high) => self.polarity.is_active(high),
            Err(_) => {
                warn!("leak contact: {}", Error::from(SensorError::GpioReadFailed));
                true
            }
        }
    }
}

/// Supply-health input.  The usual wiring is active-low: the line is held
/// high while mains is present.
pub struct GpioPowerSensor<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> GpioPowerSensor<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }
}

impl<P: InputPin> PowerSensor for GpioPowerSensor<P> {
    fn tripped(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => self.polarity.is_active(high),
            Err(_) => {
                warn!("power input: {}", Error::from(SensorError::GpioReadFailed));
                true
            }
        }
    }
}

// ── Outputs ───────────────────────────────────────────────────

/// A single relay (SSR) or buzzer output.
pub struct GpioRelay<P> {
    pin: P,
    polarity: Polarity,
    label: &'static str,
}

impl<P: OutputPin> GpioRelay<P> {
    pub fn new(pin: P, polarity: Polarity, label: &'static str) -> Self {
        Self {
            pin,
            polarity,
            label,
        }
    }

    pub fn set(&mut self, on: bool) {
        if self.pin.set_state(self.polarity.level(on)).is_err() {
            warn!("{}: {}", self.label, Error::from(ActuatorError::GpioWriteFailed));
        }
    }
}

impl<P: OutputPin> PumpOutput for GpioRelay<P> {
    fn set_pump(&mut self, on: bool) {
        self.set(on);
    }
}

impl<P: OutputPin> AlarmTone for GpioRelay<P> {
    fn start(&mut self) {
        self.set(true);
    }

    fn stop(&mut self) {
        self.set(false);
    }
}

impl<P: OutputPin> StatusLed for GpioRelay<P> {
    fn set_led(&mut self, on: bool) {
        self.set(on);
    }
}

/// Valve motor relays.
pub struct GpioValve<O, C> {
    open: GpioRelay<O>,
    close: GpioRelay<C>,
}

impl<O: OutputPin, C: OutputPin> GpioValve<O, C> {
    pub fn new(open: GpioRelay<O>, close: GpioRelay<C>) -> Self {
        Self { open, close }
    }
}

impl<O: OutputPin, C: OutputPin> ValveOutput for GpioValve<O, C> {
    fn set_open_drive(&mut self, on: bool) {
        self.open.set(on);
    }

    fn set_close_drive(&mut self, on: bool) {
        self.close.set(on);
    }
}
