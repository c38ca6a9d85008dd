//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter   | Implements  | Connects to                         |
//! |-----------|-------------|-------------------------------------|
//! | `hal_pin` | PinSource   | `embedded_hal::digital::InputPin`   |

pub mod hal_pin;

pub use hal_pin::HalPin;
