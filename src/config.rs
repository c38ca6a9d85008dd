//! Sensor configuration.
//!
//! The configuration record handed over by the platform layer at probe
//! time.  Immutable for the lifetime of the controller: the sensor
//! function is fixed at manufacture, so there is no runtime
//! reconfiguration path.  The optional direct-publish callback travels
//! next to — not inside — this record, since functions do not
//! serialise.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ports::PinId;

/// Which sensing arrangement this board carries.
///
/// Dock boards wire two hall switches (north and south poles of the
/// dock magnet); kickstand boards wire a single switch with inverted
/// sense.  Exactly one of north/south maps to each dock kind, selected
/// by `north_is_desk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorFunction {
    Dock {
        north: PinId,
        south: PinId,
        north_is_desk: bool,
    },
    Kickstand {
        pin: PinId,
    },
}

/// Core sensor configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorConfig {
    pub function: SensorFunction,
}

impl SensorConfig {
    /// Dock-mode configuration (two pins).
    pub fn dock(north: PinId, south: PinId, north_is_desk: bool) -> Self {
        Self {
            function: SensorFunction::Dock {
                north,
                south,
                north_is_desk,
            },
        }
    }

    /// Kickstand-mode configuration (single pin).
    pub fn kickstand(pin: PinId) -> Self {
        Self {
            function: SensorFunction::Kickstand { pin },
        }
    }

    /// Structural validation, run before any resource is acquired.
    pub fn validate(&self) -> crate::error::Result<()> {
        match self.function {
            SensorFunction::Dock { north, south, .. } => {
                if north < 0 || south < 0 {
                    return Err(Error::InvalidConfiguration("negative pin id"));
                }
                if north == south {
                    return Err(Error::InvalidConfiguration(
                        "north and south share a pin",
                    ));
                }
            }
            SensorFunction::Kickstand { pin } => {
                if pin < 0 {
                    return Err(Error::InvalidConfiguration("negative pin id"));
                }
            }
        }
        Ok(())
    }
}
