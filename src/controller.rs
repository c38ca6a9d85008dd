//! Dock sensor controller — owns the whole interrupt-to-state pipeline.
//!
//! ```text
//!  edge ──▶ handler: mask + enqueue ──▶ worker: read level
//!                                          │  resolve polarity
//!                                          │  publish state
//!                                          ▼
//!                                        unmask
//! ```
//!
//! One `PendingWork` unit exists per monitored pin, created at init
//! and retired at teardown.  The bound edge handler masks its source
//! before enqueueing, so a pin never has more than one unit outstanding
//! no matter how hard its line bounces; the source stays masked until
//! the worker has published and unmasks it.
//!
//! Init acquires resources in a fixed order (publisher, queue, pins)
//! and any failure unwinds everything already acquired in reverse —
//! a partially constructed controller never escapes.  Teardown stops
//! edge delivery first, drains the queue, and only then releases the
//! pin claims and the switch registration, so the worker can never
//! touch a released resource.

use std::sync::Arc;

use log::{debug, error, info};

use crate::config::{SensorConfig, SensorFunction};
use crate::debounce;
use crate::error::Error;
use crate::ports::{EdgeHandler, PinId, PinSource, Platform};
use crate::queue::{EventQueue, WorkUnit};
use crate::state::DockState;
use crate::switch::{SetSwitchFn, StatePublisher, SwitchDevice};

/// Name used for the worker thread and in log lines.
pub const DRIVER_NAME: &str = "docksense";

// ───────────────────────────────────────────────────────────────
// Pin roles
// ───────────────────────────────────────────────────────────────

/// Semantic identity of a monitored pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    North,
    South,
    Kickstand,
}

// ───────────────────────────────────────────────────────────────
// Pending work
// ───────────────────────────────────────────────────────────────

/// One deferred work unit, bound to a single pin for the controller's
/// lifetime.  Self-contained: by the time it reaches the worker it
/// carries everything a publish needs.
struct PendingWork {
    role: PinRole,
    pin: Arc<dyn PinSource>,
    mapped: DockState,
    kickstand: bool,
    publisher: Arc<StatePublisher>,
}

impl PendingWork {
    /// Read the pin, resolve, publish.  Returns whether the pin is
    /// asserted, which the init pass uses to order its publishes.
    fn update(&self) -> bool {
        let level = self.pin.level();
        let state = debounce::resolve(level, self.kickstand, self.mapped);
        debug!(
            "{DRIVER_NAME}: {:?} level={} -> {}",
            self.role, level, state
        );
        self.publisher.publish(state);
        debounce::asserted(level, self.kickstand)
    }
}

impl WorkUnit for PendingWork {
    fn run(&self) {
        self.update();
        self.pin.unmask();
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

struct ActivePin {
    id: PinId,
    role: PinRole,
    source: Arc<dyn PinSource>,
    work: Arc<PendingWork>,
}

/// Aggregate root: owns the configuration, the queue, the per-pin work
/// units, and the publisher.  Everything is released together at
/// teardown (or on drop, if the caller forgets).
pub struct SensorController {
    config: SensorConfig,
    platform: Platform,
    publisher: Arc<StatePublisher>,
    queue: EventQueue,
    pins: Vec<ActivePin>,
    torn_down: bool,
}

impl SensorController {
    /// Bring the sensor up.
    ///
    /// Registers the switch device when `set_switch` is absent, spawns
    /// the worker, claims and subscribes each configured pin with wake
    /// enabled on both edges, then runs the synchronous initial pass so
    /// the published state is correct before this returns.  On any
    /// failure every resource acquired so far is released in reverse
    /// order and the error is surfaced; nothing is retried.
    pub fn init(
        config: SensorConfig,
        platform: Platform,
        set_switch: Option<SetSwitchFn>,
    ) -> crate::error::Result<Self> {
        config.validate()?;

        let publisher = match set_switch {
            Some(set_switch) => Arc::new(StatePublisher::Callback(set_switch)),
            None => {
                let device = Arc::new(SwitchDevice::new());
                if let Err(e) = platform.switches.register(&device) {
                    error!("{DRIVER_NAME}: switch device registration failed: {e}");
                    return Err(Error::PublishRegistration(e));
                }
                Arc::new(StatePublisher::Switch(device))
            }
        };

        let queue = match EventQueue::new(DRIVER_NAME) {
            Ok(queue) => queue,
            Err(e) => {
                error!("{DRIVER_NAME}: cannot create work queue: {e}");
                if let Some(device) = publisher.switch() {
                    platform.switches.unregister(device);
                }
                return Err(Error::Allocation);
            }
        };

        let mut controller = Self {
            config,
            platform,
            publisher,
            queue,
            pins: Vec::new(),
            torn_down: false,
        };

        if let Err(e) = controller.attach_all() {
            controller.release_all();
            return Err(e);
        }

        controller.initial_pass();
        info!("{DRIVER_NAME}: ready ({:?})", controller.config.function);
        Ok(controller)
    }

    /// The registered switch device, when no publish callback was
    /// supplied at init.
    pub fn switch(&self) -> Option<&Arc<SwitchDevice>> {
        self.publisher.switch()
    }

    /// Release every device resource: stop edge delivery, drain the
    /// worker, release the pin claims, unregister the switch device.
    /// Blocks until any in-flight publish has completed.
    pub fn teardown(mut self) {
        self.release_all();
        info!("{DRIVER_NAME}: removed");
    }

    // ── Bring-up ──────────────────────────────────────────────

    fn attach_all(&mut self) -> crate::error::Result<()> {
        match self.config.function {
            SensorFunction::Dock {
                north,
                south,
                north_is_desk,
            } => {
                let (north_value, south_value) = if north_is_desk {
                    (DockState::Desk, DockState::Car)
                } else {
                    (DockState::Car, DockState::Desk)
                };
                self.attach_pin(north, PinRole::North, north_value, false)?;
                self.attach_pin(south, PinRole::South, south_value, false)?;
            }
            SensorFunction::Kickstand { pin } => {
                // Kickstand emulates a desk dock, with inverted sense.
                self.attach_pin(pin, PinRole::Kickstand, DockState::Desk, true)?;
            }
        }
        Ok(())
    }

    fn attach_pin(
        &mut self,
        id: PinId,
        role: PinRole,
        mapped: DockState,
        kickstand: bool,
    ) -> crate::error::Result<()> {
        let source = match self.platform.pins.claim(id) {
            Ok(source) => source,
            Err(e) => {
                error!("{DRIVER_NAME}: {role:?} pin claim failed: {e}");
                return Err(Error::Subscription(e));
            }
        };

        let work = Arc::new(PendingWork {
            role,
            pin: Arc::clone(&source),
            mapped,
            kickstand,
            publisher: Arc::clone(&self.publisher),
        });

        // The handler is bound to this pin's identity here, once.
        // Masking before the enqueue is what keeps the per-pin queue
        // depth at one.
        let handler: EdgeHandler = {
            let pin = Arc::clone(&source);
            let queue = self.queue.handle();
            let unit = Arc::clone(&work);
            Arc::new(move || {
                pin.mask();
                queue.schedule(unit.clone());
            })
        };
        if let Err(e) = source.subscribe(handler) {
            error!("{DRIVER_NAME}: {role:?} edge subscription failed: {e}");
            self.platform.pins.release(id);
            return Err(Error::Subscription(e));
        }
        source.set_wake_enabled(true);

        self.pins.push(ActivePin {
            id,
            role,
            source,
            work,
        });
        Ok(())
    }

    /// Establish the initial published state, synchronously, before
    /// interrupts have had a chance to fire.  Dock mode checks the
    /// south pin first and only consults north when south is clear;
    /// kickstand mode is a single pass.
    fn initial_pass(&self) {
        match self.config.function {
            SensorFunction::Dock { .. } => {
                let south_asserted = match self.pin_for(PinRole::South) {
                    Some(south) => south.work.update(),
                    None => false,
                };
                if !south_asserted {
                    if let Some(north) = self.pin_for(PinRole::North) {
                        north.work.update();
                    }
                }
            }
            SensorFunction::Kickstand { .. } => {
                if let Some(kickstand) = self.pin_for(PinRole::Kickstand) {
                    kickstand.work.update();
                }
            }
        }
    }

    fn pin_for(&self, role: PinRole) -> Option<&ActivePin> {
        self.pins.iter().find(|pin| pin.role == role)
    }

    // ── Teardown / unwind ─────────────────────────────────────

    /// Shared by teardown, drop, and the init failure path.  Reverse
    /// acquisition order throughout; pin claims and the switch
    /// registration are only released once the queue is drained.
    fn release_all(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        for pin in self.pins.iter().rev() {
            pin.source.set_wake_enabled(false);
            pin.source.unsubscribe();
        }
        self.queue.shutdown();
        for pin in self.pins.drain(..).rev() {
            self.platform.pins.release(pin.id);
        }
        if let Some(device) = self.publisher.switch() {
            self.platform.switches.unregister(device);
        }
    }
}

impl std::fmt::Debug for SensorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorController").finish_non_exhaustive()
    }
}

impl Drop for SensorController {
    fn drop(&mut self) {
        self.release_all();
    }
}
