//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging event handlers into a
//! scheduler. Handlers are called synchronously from the completion path of
//! the task that produced the event, after the scheduler's own lock has been
//! released, so they may call back into the scheduler (`enqueue`, `stats`, ...).
//!
//! ## Contract
//! - Keep handlers short; they run inline with slot accounting.
//! - A panic is caught by the bus and logged; it never corrupts counters.
//!
//! Any `Fn(&Event) + Send + Sync + 'static` closure is a subscriber.

use crate::events::Event;

/// Contract for event subscribers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Subscribe for F
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}
