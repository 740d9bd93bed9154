//! # Priority store with a lazily sorted append log.
//!
//! Entries are appended unsorted and a dirty flag is raised. The sort runs
//! once, on the first `dequeue` after a mutation, so a burst of `enqueue`
//! calls followed by a single `dequeue` costs one sort.
//!
//! ## Order
//! ```text
//! priority desc ─► enqueued_at asc ─► insertion seq asc
//! ```
//! The log is kept sorted with the most urgent entry **last**, so `dequeue`
//! is a `Vec::pop` while the flag is clear.

use std::cmp::Ordering;
use std::time::Instant;

use super::{EnqueueOptions, OrderedStore};

/// Entry held by [`PriorityStore`].
#[derive(Debug)]
struct QueueEntry<T> {
    item: T,
    priority: i64,
    enqueued_at: Instant,
    /// Breaks ties between entries stamped with the same instant.
    seq: u64,
}

impl<T> QueueEntry<T> {
    /// `Less` means `self` is dispatched before `other`.
    fn urgency(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.enqueued_at.cmp(&other.enqueued_at))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Store that hands out the highest-priority, earliest-enqueued item first.
///
/// # Example
/// ```
/// use tasklane::{EnqueueOptions, OrderedStore, PriorityStore};
///
/// let mut store = PriorityStore::new();
/// store.enqueue(vec![
///     ("low", EnqueueOptions::priority(1)),
///     ("mid", EnqueueOptions::priority(2)),
///     ("high", EnqueueOptions::priority(3)),
/// ]);
/// assert_eq!(store.dequeue(), Some("high"));
/// assert_eq!(store.dequeue(), Some("mid"));
/// assert_eq!(store.dequeue(), Some("low"));
/// ```
#[derive(Debug)]
pub struct PriorityStore<T> {
    log: Vec<QueueEntry<T>>,
    dirty: bool,
    next_seq: u64,
}

impl<T> PriorityStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            dirty: false,
            next_seq: 0,
        }
    }

    /// True if the next `dequeue` has to sort first.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn sort(&mut self) {
        // Stable sort; most urgent ends up at the tail.
        self.log.sort_by(|a, b| b.urgency(a));
        self.dirty = false;
    }
}

impl<T> Default for PriorityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> OrderedStore<T> for PriorityStore<T> {
    fn len(&self) -> usize {
        self.log.len()
    }

    fn enqueue(&mut self, items: Vec<(T, EnqueueOptions)>) {
        let now = Instant::now();
        self.log.reserve(items.len());
        for (item, opts) in items {
            self.log.push(QueueEntry {
                item,
                priority: opts.priority,
                enqueued_at: opts.enqueued_at.unwrap_or(now),
                seq: self.next_seq,
            });
            self.next_seq += 1;
        }
        self.dirty = true;
    }

    fn dequeue(&mut self) -> Option<T> {
        if self.dirty {
            self.sort();
        }
        self.log.pop().map(|entry| entry.item)
    }
}
