//! # Synchronous event bus.
//!
//! [`EventBus`] keeps an ordered list of subscribers per [`EventKind`] and
//! delivers each emitted [`Event`] to them in place, on the emitting thread.
//!
//! ## Rules
//! - **Registration order**: handlers run in the order they were added.
//! - **Duplicates**: the same handler registered `n` times runs `n` times.
//! - **Snapshot**: `emit` copies the list first; `on`/`off` performed by a
//!   handler only affect later emissions.
//! - **Isolation**: a panicking handler is caught and logged; the remaining
//!   handlers still run.
//! - **Identity**: `off` matches by `Arc` pointer and removes every copy.
//!
//! ```text
//! emit(&Event)
//!     │  lock ─► clone Vec<Arc<dyn Subscribe>> ─► unlock
//!     ├──► sub1.on_event(&Event)
//!     ├──► sub2.on_event(&Event)
//!     └──► subN.on_event(&Event)
//! ```

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use super::event::{Event, EventKind};
use crate::error::TaskError;
use crate::subscribers::Subscribe;

/// Per-kind subscriber registry with synchronous delivery.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<HashMap<EventKind, Vec<Arc<dyn Subscribe>>>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`.
    pub fn on(&self, kind: EventKind, handler: Arc<dyn Subscribe>) {
        self.lock().entry(kind).or_default().push(handler);
    }

    /// Removes every registration of `handler` for `kind`.
    ///
    /// Returns how many registrations were removed.
    pub fn off(&self, kind: EventKind, handler: &Arc<dyn Subscribe>) -> usize {
        let mut handlers = self.lock();
        let Some(list) = handlers.get_mut(&kind) else {
            return 0;
        };
        let before = list.len();
        list.retain(|h| !same_handler(h, handler));
        before - list.len()
    }

    /// Delivers `event` to a snapshot of the subscribers for its kind.
    pub fn emit(&self, event: &Event) {
        let snapshot = match self.lock().get(&event.kind()) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => return,
        };

        for handler in snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler.on_event(event))) {
                let err = TaskError::from_panic(panic);
                warn!(
                    subscriber = handler.name(),
                    event = event.kind().as_label(),
                    error = %err,
                    "event handler panicked"
                );
            }
        }
    }

    /// Number of registrations for `kind`.
    pub fn len(&self, kind: EventKind) -> usize {
        self.lock().get(&kind).map_or(0, Vec::len)
    }

    /// True if no handler is registered for any kind.
    pub fn is_empty(&self) -> bool {
        self.lock().values().all(Vec::is_empty)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<EventKind, Vec<Arc<dyn Subscribe>>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("idle", &self.len(EventKind::Idle))
            .field("error", &self.len(EventKind::Error))
            .finish()
    }
}

/// Compares data pointers only; vtable pointers may differ across codegen units.
fn same_handler(a: &Arc<dyn Subscribe>, b: &Arc<dyn Subscribe>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
