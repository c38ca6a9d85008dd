//! Port traits — the boundary between the sensor engine and the platform.
//!
//! ```text
//!   Platform adapter ──▶ Port trait ──▶ SensorController (domain)
//! ```
//!
//! The platform implements these traits over its real GPIO/IRQ subsystem
//! and switch class; the controller consumes them through trait objects,
//! so the engine never touches hardware directly.  Host tests implement
//! them with mock adapters.

use std::sync::Arc;

use crate::switch::SwitchDevice;

/// Identifier for a physical input line, as assigned by the board wiring.
pub type PinId = i32;

/// Handler invoked on each interrupt edge, bound to one pin's identity
/// at subscription time.  Runs in interrupt context: it must not block,
/// allocate, or take long-held locks.
pub type EdgeHandler = Arc<dyn Fn() + Send + Sync>;

// ───────────────────────────────────────────────────────────────
// Pin capability (driven adapter: GPIO/IRQ subsystem → domain)
// ───────────────────────────────────────────────────────────────

/// One claimed interrupt-capable input line.
///
/// `level` is assumed always to succeed — a hardware-level guarantee of
/// the underlying GPIO block, not something the engine re-checks.
pub trait PinSource: Send + Sync {
    /// Current raw logic level (true = high).
    fn level(&self) -> bool;

    /// Register `handler` for both rising and falling edges.  Delivery
    /// starts immediately on success.
    fn subscribe(&self, handler: EdgeHandler) -> Result<(), PinError>;

    /// Remove the edge handler.  No further deliveries after return.
    fn unsubscribe(&self);

    /// Suppress edge delivery until [`unmask`](Self::unmask).
    fn mask(&self);

    /// Re-enable edge delivery.
    fn unmask(&self);

    /// Mark (or unmark) this source as able to wake the system from a
    /// low-power state.
    fn set_wake_enabled(&self, enabled: bool);
}

/// Claim/release side of the GPIO subsystem.  Claiming derives the
/// pin's interrupt source; releasing returns the line to the platform.
pub trait PinBank: Send + Sync {
    fn claim(&self, pin: PinId) -> Result<Arc<dyn PinSource>, PinError>;
    fn release(&self, pin: PinId);
}

// ───────────────────────────────────────────────────────────────
// Switch class (driven adapter: domain → state observers)
// ───────────────────────────────────────────────────────────────

/// Registry of queryable switch devices.  Used only when the caller
/// supplies no direct publish callback.
pub trait SwitchRegistry: Send + Sync {
    fn register(&self, switch: &Arc<SwitchDevice>) -> Result<(), RegistryError>;
    fn unregister(&self, switch: &Arc<SwitchDevice>);
}

// ───────────────────────────────────────────────────────────────
// Platform bundle
// ───────────────────────────────────────────────────────────────

/// The two platform capabilities handed to the driver at probe time.
#[derive(Clone)]
pub struct Platform {
    pub pins: Arc<dyn PinBank>,
    pub switches: Arc<dyn SwitchRegistry>,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PinBank`] / [`PinSource`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// The pin does not exist or cannot map to an interrupt source.
    NotAvailable,
    /// The pin is already claimed by another owner.
    AlreadyClaimed,
    /// An edge handler is already subscribed on this source.
    AlreadySubscribed,
    /// The platform rejected the subscription.  Carries the platform's
    /// return code.
    SubscribeFailed(i32),
}

/// Errors from [`SwitchRegistry`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A switch with the same name is already registered.
    NameTaken,
    /// The platform rejected the registration.  Carries the platform's
    /// return code.
    RegisterFailed(i32),
}

impl core::fmt::Display for PinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "pin not available"),
            Self::AlreadyClaimed => write!(f, "pin already claimed"),
            Self::AlreadySubscribed => write!(f, "edge handler already subscribed"),
            Self::SubscribeFailed(rc) => write!(f, "subscribe failed (rc={})", rc),
        }
    }
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NameTaken => write!(f, "switch name already registered"),
            Self::RegisterFailed(rc) => write!(f, "switch registration failed (rc={})", rc),
        }
    }
}
