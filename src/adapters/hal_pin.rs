//! `embedded-hal` digital input bridge.
//!
//! Boards whose GPIO driver speaks `embedded_hal::digital::InputPin`
//! can wrap each line in a [`HalPin`] to satisfy the engine's pin
//! capability.  The HAL traits carry no interrupt surface, so the
//! platform's real ISR trampoline calls [`notify_edge`](HalPin::notify_edge)
//! on each hardware edge; masking is a software gate in front of the
//! subscribed handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use embedded_hal::digital::InputPin;

use crate::ports::{EdgeHandler, PinError, PinSource};

pub struct HalPin<P> {
    input: Mutex<P>,
    last_level: AtomicBool,
    masked: AtomicBool,
    wake: AtomicBool,
    handler: Mutex<Option<EdgeHandler>>,
}

impl<P: InputPin + Send> HalPin<P> {
    pub fn new(input: P) -> Self {
        Self {
            input: Mutex::new(input),
            last_level: AtomicBool::new(false),
            masked: AtomicBool::new(false),
            wake: AtomicBool::new(false),
            handler: Mutex::new(None),
        }
    }

    /// Entry point for the platform's ISR trampoline.  Invokes the
    /// subscribed handler unless the source is masked; an edge with no
    /// subscriber is dropped.
    pub fn notify_edge(&self) {
        if self.masked.load(Ordering::Acquire) {
            return;
        }
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn wake_enabled(&self) -> bool {
        self.wake.load(Ordering::Acquire)
    }
}

impl<P: InputPin + Send> PinSource for HalPin<P> {
    fn level(&self) -> bool {
        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        match input.is_high() {
            Ok(level) => {
                self.last_level.store(level, Ordering::Release);
                level
            }
            // Reads are assumed good at this layer; hold the last
            // observed level over a transient HAL error.
            Err(_) => self.last_level.load(Ordering::Acquire),
        }
    }

    fn subscribe(&self, handler: EdgeHandler) -> Result<(), PinError> {
        let mut slot = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(PinError::AlreadySubscribed);
        }
        *slot = Some(handler);
        Ok(())
    }

    fn unsubscribe(&self) {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn mask(&self) {
        self.masked.store(true, Ordering::Release);
    }

    fn unmask(&self) {
        self.masked.store(false, Ordering::Release);
    }

    fn set_wake_enabled(&self, enabled: bool) {
        self.wake.store(enabled, Ordering::Release);
    }
}
