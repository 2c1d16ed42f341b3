//! Log-based sink adapters.
//!
//! [`LogEventSink`] writes structured station events to the logger (UART /
//! USB-CDC in production) and [`LogStatusSink`] renders the periodic
//! status line there too, standing in for a character display.

use log::{info, warn};

use crate::app::events::StationEvent;
use crate::app::ports::{EventSink, StatusSink};
use crate::status::render_status_line;
use crate::valve::ValveSubState;

/// Adapter that logs every [`StationEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &StationEvent) {
        match event {
            StationEvent::Started { state } => {
                info!("START | initial_state={:?}", state);
            }
            StationEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            StationEvent::ValveChanged { from, to, reason } => match reason {
                Some(fault) => info!("VALVE | {} -> {} ({})", from.label(), to.label(), fault),
                None => info!("VALVE | {} -> {}", from.label(), to.label()),
            },
            StationEvent::FaultDetected { faults } => {
                warn!(
                    "FAULT | leak={} power={}",
                    faults.leak_detected, faults.power_fault
                );
            }
            StationEvent::FaultCleared => {
                info!("FAULT | all cleared");
            }
            StationEvent::Suspended => {
                warn!("SUSPEND | persistent power loss");
            }
            StationEvent::Woken => {
                info!("WAKE | re-initializing");
            }
        }
    }
}

/// Renders the status line to the log on every display tick.
#[derive(Debug, Default)]
pub struct LogStatusSink;

impl LogStatusSink {
    pub fn new() -> Self {
        Self
    }
}

impl StatusSink for LogStatusSink {
    fn report(&mut self, leak: bool, power: bool, valve: ValveSubState) {
        info!("{}", render_status_line(leak, power, valve));
    }
}
