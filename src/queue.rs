//! Single-worker deferred-execution queue.
//!
//! Work units are produced by edge handlers running in interrupt
//! context and consumed by one dedicated worker thread, which keeps
//! state publishes strictly ordered:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ edge handler │────▶│              │     │              │
//! │ edge handler │────▶│  FIFO + cv   │────▶│ worker thread│
//! │      …       │────▶│              │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! FIFO order, one unit at a time, no work-stealing and no
//! parallelism: two units never execute concurrently, so observers
//! never see state transitions interleave.  The FIFO is a
//! fixed-capacity `heapless::Deque`, so `schedule` never allocates;
//! producers mask their source before enqueueing, which bounds the
//! depth at one unit per monitored pin.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

/// Maximum number of queued units.  Far above the one-per-pin bound the
/// mask-before-enqueue discipline enforces.
pub const QUEUE_CAP: usize = 8;

/// A deferred unit of work.  Units are long-lived: the queue holds a
/// reference while one is pending, it is never consumed destructively.
pub trait WorkUnit: Send + Sync {
    fn run(&self);
}

struct Fifo {
    units: heapless::Deque<Arc<dyn WorkUnit>, QUEUE_CAP>,
    shutdown: bool,
}

struct Shared {
    fifo: Mutex<Fifo>,
    ready: Condvar,
}

/// Producer handle, cheap to clone into edge-handler closures.
#[derive(Clone)]
pub struct QueueHandle {
    shared: Arc<Shared>,
}

impl QueueHandle {
    /// Enqueue a unit.  Returns immediately; never blocks beyond the
    /// internal mutex.  `false` means the unit was not queued — the
    /// queue is shut down or full, both contract violations on a
    /// correctly masked pin set.
    pub fn schedule(&self, unit: Arc<dyn WorkUnit>) -> bool {
        schedule_on(&self.shared, unit)
    }
}

/// The queue itself: owns the worker thread.
pub struct EventQueue {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl EventQueue {
    /// Spawn the worker thread.  `name` shows up in thread listings.
    pub fn new(name: &str) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            fifo: Mutex::new(Fifo {
                units: heapless::Deque::new(),
                shutdown: false,
            }),
            ready: Condvar::new(),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || worker_loop(&worker_shared))?;
        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Producer handle for interrupt-side schedulers.
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Enqueue a unit directly (see [`QueueHandle::schedule`]).
    pub fn schedule(&self, unit: Arc<dyn WorkUnit>) -> bool {
        schedule_on(&self.shared, unit)
    }

    /// Number of units currently pending (not counting one in flight).
    pub fn len(&self) -> usize {
        lock_fifo(&self.shared).units.len()
    }

    pub fn is_empty(&self) -> bool {
        lock_fifo(&self.shared).units.is_empty()
    }

    /// Stop accepting units, run everything already enqueued to
    /// completion, then join the worker.  Blocks the caller until the
    /// in-flight and pending units have all finished.  Callers must
    /// guarantee no producer can enqueue after this begins (mask or
    /// unsubscribe every source first).
    pub fn shutdown(&mut self) {
        lock_fifo(&self.shared).shutdown = true;
        self.shared.ready.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("queue worker panicked during shutdown");
            }
        }
    }
}

impl Drop for EventQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Internal ──────────────────────────────────────────────────

fn lock_fifo(shared: &Shared) -> std::sync::MutexGuard<'_, Fifo> {
    shared.fifo.lock().unwrap_or_else(PoisonError::into_inner)
}

fn schedule_on(shared: &Shared, unit: Arc<dyn WorkUnit>) -> bool {
    {
        let mut fifo = lock_fifo(shared);
        if fifo.shutdown {
            debug!("schedule after shutdown, unit dropped");
            return false;
        }
        if fifo.units.push_back(unit).is_err() {
            warn!("work queue full, unit dropped");
            return false;
        }
    }
    shared.ready.notify_one();
    true
}

fn worker_loop(shared: &Shared) {
    loop {
        let unit = {
            let mut fifo = lock_fifo(shared);
            loop {
                if let Some(unit) = fifo.units.pop_front() {
                    break unit;
                }
                if fifo.shutdown {
                    return;
                }
                fifo = shared
                    .ready
                    .wait(fifo)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        unit.run();
    }
}
