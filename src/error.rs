//! Unified error types for the dock sensor engine.
//!
//! A single `Error` enum that every init-time failure funnels into,
//! keeping the platform layer's error handling uniform.  All variants
//! are `Copy` so they can be cheaply passed back through the probe path
//! without allocation.  Steady-state operation has no error path at
//! all: once init succeeds, edges are masked, queued, resolved, and
//! published with no fallible step in between.

use core::fmt;

use crate::ports::{PinError, RegistryError};

/// Every fallible operation in the engine funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The deferred-work queue (worker thread) could not be created.
    Allocation,
    /// A pin claim or edge subscription failed.
    Subscription(PinError),
    /// The switch device could not be registered.
    PublishRegistration(RegistryError),
    /// The configuration is structurally invalid.
    InvalidConfiguration(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation => write!(f, "work queue allocation failed"),
            Self::Subscription(e) => write!(f, "pin subscription: {e}"),
            Self::PublishRegistration(e) => write!(f, "publish registration: {e}"),
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Subscription(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::PublishRegistration(e)
    }
}

/// Engine-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
