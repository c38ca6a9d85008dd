//! Platform driver registration contract.
//!
//! The surrounding platform owns device matching and lifecycle; this
//! module is the callback surface it drives.  `probe` runs on match,
//! `remove` on detach.  The platform treats the handle as opaque.

use crate::config::SensorConfig;
use crate::controller::SensorController;
use crate::error::Error;
use crate::ports::Platform;
use crate::switch::SetSwitchFn;

/// Device lifecycle callbacks, as the platform sees them.
pub trait PlatformDriver {
    type Handle;

    fn probe(
        &self,
        config: SensorConfig,
        platform: Platform,
        set_switch: Option<SetSwitchFn>,
    ) -> Result<Self::Handle, Error>;

    fn remove(&self, handle: Self::Handle) -> Result<(), Error>;
}

/// The hall-effect dock sensor driver.
pub struct DockDriver;

impl PlatformDriver for DockDriver {
    type Handle = SensorController;

    fn probe(
        &self,
        config: SensorConfig,
        platform: Platform,
        set_switch: Option<SetSwitchFn>,
    ) -> Result<SensorController, Error> {
        SensorController::init(config, platform, set_switch)
    }

    fn remove(&self, handle: SensorController) -> Result<(), Error> {
        handle.teardown();
        Ok(())
    }
}
