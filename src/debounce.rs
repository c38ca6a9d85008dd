//! Polarity-aware resolution of a raw pin level into a dock state.
//!
//! This is a single-sample decision, not a temporal filter: whatever
//! settling the hardware and the interrupt edges provide is the only
//! debounce there is.  The functions here are pure so the polarity
//! rules can be exercised exhaustively on the host.

use crate::state::DockState;

/// Whether a pin is asserted at the given raw level.
///
/// The hall sensor outputs are open-drain: a magnet in range pulls the
/// line low, so active is `!level`.  The kickstand sense is inverted at
/// the board level, applied as a second negation.  Keep the two
/// negations separate; the net polarity matches the shipped hardware.
pub fn asserted(level: bool, kickstand: bool) -> bool {
    let mut active = !level;
    if kickstand {
        active = !active;
    }
    active
}

/// Resolve a raw pin level to the published dock state.
///
/// Returns `mapped` when the pin is asserted, `DockState::None`
/// otherwise.  A `mapped` of `None` degenerates to `None` regardless of
/// level; that is acceptable, not an error.
pub fn resolve(level: bool, kickstand: bool, mapped: DockState) -> DockState {
    if asserted(level, kickstand) {
        mapped
    } else {
        DockState::None
    }
}
