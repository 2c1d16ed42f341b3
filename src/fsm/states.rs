//! Concrete state handler functions and table builder.
//!
//! ```text
//!  INITIALIZING ──[close issued]──▶ TRANSITIONING ◀──┐
//!        ▲                              │            │
//!        │                     [stroke deadline]     │
//!        │                              ▼            │
//!     [wake]                       MONITORING ───────┘
//!        │                              │   [fault: close / healthy: open]
//!        │                  [power fault persists, valve closed]
//!        │                              ▼
//!        └───────────────────────── SUSPENDED
//! ```

use super::context::StationContext;
use super::{ControlState, StateDescriptor};
use crate::app::ports::StationIo;
use crate::deadline::Timer;
use crate::error::StationFault;
use crate::valve::ValveSubState;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; ControlState::COUNT] {
    [
        // Index 0: Initializing
        StateDescriptor {
            id: ControlState::Initializing,
            name: "Initializing",
            on_enter: None,
            on_exit: None,
            on_update: initializing_update,
        },
        // Index 1: Monitoring
        StateDescriptor {
            id: ControlState::Monitoring,
            name: "Monitoring",
            on_enter: None,
            on_exit: None,
            on_update: monitoring_update,
        },
        // Index 2: Transitioning
        StateDescriptor {
            id: ControlState::Transitioning,
            name: "Transitioning",
            on_enter: None,
            on_exit: None,
            on_update: transitioning_update,
        },
        // Index 3: Suspended
        StateDescriptor {
            id: ControlState::Suspended,
            name: "Suspended",
            on_enter: Some(suspended_enter),
            on_exit: Some(suspended_exit),
            on_update: suspended_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIALIZING: nothing is known about the valve, drive it closed
// ═══════════════════════════════════════════════════════════════════════════

fn initializing_update(ctx: &mut StationContext, io: &mut dyn StationIo) -> Option<ControlState> {
    // Assume open so the close stroke is always issued.
    ctx.valve.assume(ValveSubState::Opened);
    ctx.close_reason = None;
    ctx.starting_up = true;
    let accepted = ctx.valve.request_close(io, &mut ctx.deadlines);
    debug_assert!(accepted);
    info!("INITIALIZING: driving valve to fail-safe closed position");
    Some(ControlState::Transitioning)
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING: re-check sensors on the check cadence
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_update(ctx: &mut StationContext, io: &mut dyn StationIo) -> Option<ControlState> {
    if !ctx.deadlines.elapsed(Timer::Check) {
        return None;
    }

    ctx.faults = ctx.monitor.refresh(io, &mut ctx.deadlines);

    if let Some(reason) = ctx.faults.primary() {
        if ctx.valve.request_close(io, &mut ctx.deadlines) {
            warn!("MONITORING: {reason}, closing valve");
            ctx.close_reason = Some(reason);
            return Some(ControlState::Transitioning);
        }

        if ctx.faults.power_fault && ctx.valve.state() == ValveSubState::Closed {
            let now = ctx.deadlines.now();
            let lasted = ctx.monitor.power_fault_duration(now).unwrap_or(0);
            if lasted >= ctx.config.deep_fault_after_ms {
                warn!("MONITORING: {} ({lasted} ms), suspending", StationFault::DeepFault);
                return Some(ControlState::Suspended);
            }
        }
        return None;
    }

    if ctx.valve.request_open(io, &mut ctx.deadlines) {
        info!("MONITORING: sensors healthy, opening valve");
        ctx.close_reason = None;
        return Some(ControlState::Transitioning);
    }
    ctx.valve.resume_pump_if_open(io);

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  TRANSITIONING: wait out the stroke without re-evaluating faults
// ═══════════════════════════════════════════════════════════════════════════

fn transitioning_update(ctx: &mut StationContext, io: &mut dyn StationIo) -> Option<ControlState> {
    if !ctx.deadlines.elapsed(Timer::Check) {
        return None;
    }

    // Timeout is the completion signal: assume the end-stop was reached.
    debug_assert!(ctx.valve.state().is_moving());
    ctx.valve.finalize_transition(io);
    ctx.starting_up = false;
    Some(ControlState::Monitoring)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SUSPENDED: persistent power loss, wait for an external wake
// ═══════════════════════════════════════════════════════════════════════════

fn suspended_enter(ctx: &mut StationContext, io: &mut dyn StationIo) {
    ctx.valve.all_off(io);
    warn!("SUSPENDED: all outputs off, waiting for wake");
}

fn suspended_exit(_ctx: &mut StationContext, _io: &mut dyn StationIo) {
    info!("SUSPENDED: woken, re-deriving state from sensors");
}

fn suspended_update(_ctx: &mut StationContext, _io: &mut dyn StationIo) -> Option<ControlState> {
    None
}
