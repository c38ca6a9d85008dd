//! State publishing — the observer side of the engine.
//!
//! Two publisher forms exist, chosen once at construction:
//!
//! - a caller-supplied callback, invoked with each resolved state;
//! - a queryable [`SwitchDevice`] named `"dock"`, registered with the
//!   platform's switch class and polled by whoever cares.
//!
//! Publishes happen only from the worker thread (and from the init
//! thread before any edge handler is live), so the device state needs
//! nothing heavier than an atomic.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::state::DockState;

/// Name under which the switch device registers.
pub const SWITCH_NAME: &str = "dock";

/// Direct publish callback, supplied by the platform instead of a
/// registered switch device.
pub type SetSwitchFn = Box<dyn Fn(DockState) + Send + Sync>;

// ───────────────────────────────────────────────────────────────
// Switch device
// ───────────────────────────────────────────────────────────────

/// Queryable switch device holding the last published dock state.
pub struct SwitchDevice {
    name: &'static str,
    state: AtomicU8,
}

impl SwitchDevice {
    pub fn new() -> Self {
        Self {
            name: SWITCH_NAME,
            state: AtomicU8::new(DockState::None as u8),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last published state.
    pub fn state(&self) -> DockState {
        DockState::from_index(self.state.load(Ordering::Acquire) as usize)
    }

    /// Raw integer form of [`state`](Self::state), as exposed on the
    /// switch interface.
    pub fn raw_state(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    /// Human-readable form of the current state.
    pub fn print_name(&self) -> &'static str {
        self.state().label()
    }

    pub(crate) fn set_state(&self, state: DockState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

impl Default for SwitchDevice {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Publisher
// ───────────────────────────────────────────────────────────────

/// The controller's one outbound channel for resolved states.
pub enum StatePublisher {
    /// Invoke the caller's function with each state.
    Callback(SetSwitchFn),
    /// Store each state on the registered switch device.
    Switch(std::sync::Arc<SwitchDevice>),
}

impl StatePublisher {
    pub fn publish(&self, state: DockState) {
        match self {
            Self::Callback(set_switch) => set_switch(state),
            Self::Switch(device) => device.set_state(state),
        }
    }

    /// The registered switch device, if that publisher form is in use.
    pub fn switch(&self) -> Option<&std::sync::Arc<SwitchDevice>> {
        match self {
            Self::Switch(device) => Some(device),
            Self::Callback(_) => None,
        }
    }
}
