//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌───────────────┬──────────┬──────────┬──────────────────┐   │
//! │  │ ControlState  │ on_enter │ on_exit  │ on_update        │   │
//! │  ├───────────────┼──────────┼──────────┼──────────────────┤   │
//! │  │ Initializing  │    -     │    -     │ fn -> Option<>   │   │
//! │  │ Monitoring    │    -     │    -     │ fn -> Option<>   │   │
//! │  │ Transitioning │    -     │    -     │ fn -> Option<>   │   │
//! │  │ Suspended     │ fn       │ fn       │ fn -> Option<>   │   │
//! │  └───────────────┴──────────┴──────────┴──────────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each poll the engine calls `on_update` for the **current** state with
//! the shared [`StationContext`] and the installation I/O.  If it returns
//! `Some(next)`, the engine runs `on_exit` for the current state, then
//! `on_enter` for the next, and updates the current pointer.  There is no
//! default branch: every state has exactly one row.

pub mod context;
pub mod states;

use context::StationContext;
use log::info;
use serde::Serialize;

use crate::app::ports::StationIo;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Controller states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ControlState {
    /// Start-up / post-wake: drive the valve to the fail-safe position.
    Initializing = 0,
    /// Steady state: re-check sensors on the check cadence.
    Monitoring = 1,
    /// Valve stroke in progress; sensors are not re-evaluated.
    Transitioning = 2,
    /// Persistent power loss; waits for an external wake.
    Suspended = 3,
}

impl ControlState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 4;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut StationContext, &mut dyn StationIo);

/// Signature for the per-poll update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut StationContext, &mut dyn StationIo) -> Option<ControlState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single controller state.
pub struct StateDescriptor {
    pub id: ControlState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `ControlState as usize`.
    table: [StateDescriptor; ControlState::COUNT],
    current: ControlState,
    /// Polls executed (wraps at u64::MAX).
    poll_count: u64,
    /// Poll at which the current state was entered.
    state_entry_poll: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; ControlState::COUNT], initial: ControlState) -> Self {
        debug_assert!(table.iter().enumerate().all(|(i, row)| row.id as usize == i));
        Self {
            table,
            current: initial,
            poll_count: 0,
            state_entry_poll: 0,
        }
    }

    /// Advance the FSM by one poll.
    pub fn tick(&mut self, ctx: &mut StationContext, io: &mut dyn StationIo) {
        self.poll_count = self.poll_count.wrapping_add(1);

        let next = (self.row().on_update)(ctx, io);

        if let Some(next_id) = next {
            self.transition(next_id, ctx, io);
        }
    }

    /// Force an immediate transition from outside the table (wake).
    pub fn force_transition(
        &mut self,
        next: ControlState,
        ctx: &mut StationContext,
        io: &mut dyn StationIo,
    ) {
        if next != self.current {
            self.transition(next, ctx, io);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> ControlState {
        self.current
    }

    /// How many polls the FSM has been in the current state.
    pub fn polls_in_current_state(&self) -> u64 {
        self.poll_count.wrapping_sub(self.state_entry_poll)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn row(&self) -> &StateDescriptor {
        &self.table[self.current as usize]
    }

    fn transition(&mut self, next: ControlState, ctx: &mut StationContext, io: &mut dyn StationIo) {
        info!(
            "FSM transition: {} -> {} after {} polls",
            self.row().name,
            self.table[next as usize].name,
            self.polls_in_current_state()
        );

        if let Some(exit) = self.row().on_exit {
            exit(ctx, io);
        }

        self.current = next;
        self.state_entry_poll = self.poll_count;

        if let Some(enter) = self.row().on_enter {
            enter(ctx, io);
        }
    }
}
