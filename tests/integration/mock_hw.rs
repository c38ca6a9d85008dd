//! Mock platform adapters for integration tests.
//!
//! Records every claim, subscription, and registration so tests can
//! assert on the full resource history without touching real GPIO or a
//! real switch class.  Edge delivery is synchronous: `set_level` runs
//! the subscribed handler in the calling thread, exactly like an ISR
//! preempting the main flow.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use docksense::ports::{EdgeHandler, PinBank, PinError, PinId, PinSource, Platform, SwitchRegistry};
use docksense::state::DockState;
use docksense::switch::{SetSwitchFn, SwitchDevice};

// ── MockPin ───────────────────────────────────────────────────

pub struct MockPin {
    pub id: PinId,
    level: AtomicBool,
    masked: AtomicBool,
    wake: AtomicBool,
    handler: Mutex<Option<EdgeHandler>>,
    pub fail_subscribe: AtomicBool,
}

impl MockPin {
    pub fn new(id: PinId, level: bool) -> Arc<Self> {
        Arc::new(Self {
            id,
            level: AtomicBool::new(level),
            masked: AtomicBool::new(false),
            wake: AtomicBool::new(false),
            handler: Mutex::new(None),
            fail_subscribe: AtomicBool::new(false),
        })
    }

    /// Drive the line to `level`, delivering an edge on change.
    pub fn set_level(&self, level: bool) {
        let changed = self.level.swap(level, Ordering::SeqCst) != level;
        if changed {
            self.fire();
        }
    }

    /// Raw edge delivery: invokes the handler unless masked.  Edges
    /// while masked are suppressed, as hardware masking would.
    pub fn fire(&self) {
        if self.masked.load(Ordering::SeqCst) {
            return;
        }
        let handler = self.handler.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn is_masked(&self) -> bool {
        self.masked.load(Ordering::SeqCst)
    }

    pub fn is_subscribed(&self) -> bool {
        self.handler.lock().unwrap().is_some()
    }

    pub fn wake_enabled(&self) -> bool {
        self.wake.load(Ordering::SeqCst)
    }
}

impl PinSource for MockPin {
    fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    fn subscribe(&self, handler: EdgeHandler) -> Result<(), PinError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(PinError::SubscribeFailed(-22));
        }
        let mut slot = self.handler.lock().unwrap();
        if slot.is_some() {
            return Err(PinError::AlreadySubscribed);
        }
        *slot = Some(handler);
        Ok(())
    }

    fn unsubscribe(&self) {
        *self.handler.lock().unwrap() = None;
    }

    fn mask(&self) {
        self.masked.store(true, Ordering::SeqCst);
    }

    fn unmask(&self) {
        self.masked.store(false, Ordering::SeqCst);
    }

    fn set_wake_enabled(&self, enabled: bool) {
        self.wake.store(enabled, Ordering::SeqCst);
    }
}

// ── MockBank ──────────────────────────────────────────────────

pub struct MockBank {
    pins: Mutex<HashMap<PinId, Arc<MockPin>>>,
    claimed: Mutex<HashSet<PinId>>,
    fail_claim: Mutex<HashSet<PinId>>,
}

impl MockBank {
    pub fn with_pins(pins: &[(PinId, bool)]) -> Arc<Self> {
        let map = pins
            .iter()
            .map(|&(id, level)| (id, MockPin::new(id, level)))
            .collect();
        Arc::new(Self {
            pins: Mutex::new(map),
            claimed: Mutex::new(HashSet::new()),
            fail_claim: Mutex::new(HashSet::new()),
        })
    }

    pub fn pin(&self, id: PinId) -> Arc<MockPin> {
        Arc::clone(&self.pins.lock().unwrap()[&id])
    }

    pub fn fail_claim_on(&self, id: PinId) {
        self.fail_claim.lock().unwrap().insert(id);
    }

    pub fn outstanding_claims(&self) -> usize {
        self.claimed.lock().unwrap().len()
    }
}

impl PinBank for MockBank {
    fn claim(&self, pin: PinId) -> Result<Arc<dyn PinSource>, PinError> {
        if self.fail_claim.lock().unwrap().contains(&pin) {
            return Err(PinError::NotAvailable);
        }
        let source = self
            .pins
            .lock()
            .unwrap()
            .get(&pin)
            .cloned()
            .ok_or(PinError::NotAvailable)?;
        if !self.claimed.lock().unwrap().insert(pin) {
            return Err(PinError::AlreadyClaimed);
        }
        Ok(source)
    }

    fn release(&self, pin: PinId) {
        self.claimed.lock().unwrap().remove(&pin);
    }
}

// ── MockSwitchClass ───────────────────────────────────────────

pub struct MockSwitchClass {
    registered: Mutex<Vec<Arc<SwitchDevice>>>,
    pub fail_register: AtomicBool,
}

impl MockSwitchClass {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            registered: Mutex::new(Vec::new()),
            fail_register: AtomicBool::new(false),
        })
    }

    pub fn registered_count(&self) -> usize {
        self.registered.lock().unwrap().len()
    }
}

impl SwitchRegistry for MockSwitchClass {
    fn register(
        &self,
        switch: &Arc<SwitchDevice>,
    ) -> Result<(), docksense::ports::RegistryError> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(docksense::ports::RegistryError::RegisterFailed(-16));
        }
        self.registered.lock().unwrap().push(Arc::clone(switch));
        Ok(())
    }

    fn unregister(&self, switch: &Arc<SwitchDevice>) {
        self.registered
            .lock()
            .unwrap()
            .retain(|dev| !Arc::ptr_eq(dev, switch));
    }
}

// ── Gated callback sink ───────────────────────────────────────

/// Records published states; can be closed so a publish parks the
/// worker mid-flight, which lets tests freeze the pipeline at the
/// "masked, unit in flight" point.
pub struct GatedSink {
    states: Mutex<Vec<DockState>>,
    open: Mutex<bool>,
    opened: Condvar,
}

impl GatedSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            states: Mutex::new(Vec::new()),
            open: Mutex::new(true),
            opened: Condvar::new(),
        })
    }

    pub fn close(&self) {
        *self.open.lock().unwrap() = false;
    }

    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }

    pub fn states(&self) -> Vec<DockState> {
        self.states.lock().unwrap().clone()
    }

    pub fn record(&self, state: DockState) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
        drop(open);
        self.states.lock().unwrap().push(state);
    }

    pub fn callback(self: &Arc<Self>) -> SetSwitchFn {
        let sink = Arc::clone(self);
        Box::new(move |state| sink.record(state))
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub fn platform(bank: &Arc<MockBank>, switches: &Arc<MockSwitchClass>) -> Platform {
    Platform {
        pins: Arc::clone(bank) as Arc<dyn PinBank>,
        switches: Arc::clone(switches) as Arc<dyn SwitchRegistry>,
    }
}

/// Poll `cond` until it holds or a two-second deadline passes.
pub fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}
