//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                       | Connects to             |
//! |-------------|----------------------------------|-------------------------|
//! | `adc`       | AnalogChannel                    | ESP-IDF oneshot ADC     |
//! | `hal`       | LeakSensor, PowerSensor          | GPIO inputs, ADC        |
//! |             | PumpOutput, ValveOutput          | relay outputs           |
//! |             | AlarmTone, StatusLed             | buzzer and LED outputs  |
//! | `hardware`  | StationIo, AlarmPanel            | bundles the above       |
//! | `log_sink`  | EventSink, StatusSink            | serial log output       |
//! | `notify`    | EventSink                        | publish callback (JSON) |
//! | `time`      | Clock                            | ESP32 system timer      |

#[cfg(feature = "espidf")]
pub mod adc;
pub mod hal;
pub mod hardware;
pub mod log_sink;
pub mod notify;
pub mod time;
