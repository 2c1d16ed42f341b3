//! Outbound station events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log to serial, publish to
//! a message queue, etc.

use serde::Serialize;

use crate::error::StationFault;
use crate::fsm::ControlState;
use crate::monitor::FaultFlags;
use crate::valve::{RelayState, ValveSubState};

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StationEvent {
    /// The controller ran its first poll (carries the initial state).
    Started { state: ControlState },

    /// The state machine moved between states.
    StateChanged { from: ControlState, to: ControlState },

    /// The valve sub-state changed.  `reason` is set when a fault caused
    /// a close stroke.
    ValveChanged {
        from: ValveSubState,
        to: ValveSubState,
        #[serde(with = "fault_name")]
        reason: Option<StationFault>,
    },

    /// One or more faults were raised (carries the full flag set).
    FaultDetected { faults: FaultFlags },

    /// All faults have cleared.
    FaultCleared,

    /// Persistent power loss parked the station.
    Suspended,

    /// An external wake restarted the controller.
    Woken,
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationStatus {
    pub state: ControlState,
    pub valve: ValveSubState,
    pub relays: RelayState,
    pub faults: FaultFlags,
    pub alarm_sounding: bool,
    pub led_lit: bool,
    /// Polls executed since construction.
    pub polls: u64,
}

mod fault_name {
    use serde::Serializer;

    use crate::error::StationFault;

    pub fn serialize<S: Serializer>(fault: &Option<StationFault>, s: S) -> Result<S::Ok, S::Error> {
        match fault {
            Some(StationFault::LeakDetected) => s.serialize_some("leak"),
            Some(StationFault::PowerFault) => s.serialize_some("power"),
            Some(StationFault::DeepFault) => s.serialize_some("deep_fault"),
            None => s.serialize_none(),
        }
    }
}
