//! Ordering backends for queued tasks.
//!
//! The scheduler never decides dispatch order itself; it asks an
//! [`OrderedStore`] for the next item. Swapping the store changes the order
//! without touching the engine.
//!
//! ## Contents
//! - [`OrderedStore`] the capability trait (`len` / `enqueue` / `dequeue`)
//! - [`FifoStore`] strict arrival order (default)
//! - [`PriorityStore`] priority desc, then arrival time asc (lazily sorted)
//! - [`EnqueueOptions`] per-item ordering hints
//!
//! ## Quick wiring
//! ```text
//! Scheduler::enqueue(tasks) ──► store.enqueue(Vec<(TaskRef, EnqueueOptions)>)
//! consumer spawn             ──► store.dequeue() ──► Option<TaskRef>
//! ```

mod fifo;
mod priority;

use std::time::Instant;

pub use fifo::FifoStore;
pub use priority::PriorityStore;

/// Ordering hints attached to an item when it is enqueued.
///
/// Stores interpret only what they need: [`FifoStore`] ignores both fields,
/// [`PriorityStore`] uses both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnqueueOptions {
    /// Higher is more urgent. Defaults to `0`.
    pub priority: i64,
    /// Arrival timestamp; `None` means "now" at enqueue time.
    pub enqueued_at: Option<Instant>,
}

impl EnqueueOptions {
    /// Options with the given priority and an implicit arrival time.
    #[inline]
    pub fn priority(priority: i64) -> Self {
        Self {
            priority,
            enqueued_at: None,
        }
    }

    /// Overrides the arrival timestamp.
    #[inline]
    pub fn at(mut self, enqueued_at: Instant) -> Self {
        self.enqueued_at = Some(enqueued_at);
        self
    }
}

/// Minimal queue capability consumed by the scheduler.
///
/// ### Contract
/// - `enqueue` accepts items in call order.
/// - `dequeue` removes and returns the next item per the store's order, or
///   `None` when empty (never panics on empty).
/// - `len` reflects the current number of items.
///
/// Implementations that report inconsistent sizes are not guarded against.
pub trait OrderedStore<T>: Send {
    /// Number of items currently held.
    fn len(&self) -> usize;

    /// True if no items are held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds items in the given order.
    fn enqueue(&mut self, items: Vec<(T, EnqueueOptions)>);

    /// Removes and returns the next item, if any.
    fn dequeue(&mut self) -> Option<T>;
}

impl<T, S> OrderedStore<T> for Box<S>
where
    S: OrderedStore<T> + ?Sized,
{
    fn len(&self) -> usize {
        (**self).len()
    }

    fn enqueue(&mut self, items: Vec<(T, EnqueueOptions)>) {
        (**self).enqueue(items)
    }

    fn dequeue(&mut self) -> Option<T> {
        (**self).dequeue()
    }
}
