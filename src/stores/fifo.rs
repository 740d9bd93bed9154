//! # Arrival-order store.

use std::collections::VecDeque;

use super::{EnqueueOptions, OrderedStore};

/// Strict first-in, first-out store backed by a [`VecDeque`].
///
/// Ordering options are accepted and ignored.
///
/// # Example
/// ```
/// use tasklane::{EnqueueOptions, FifoStore, OrderedStore};
///
/// let mut store = FifoStore::new();
/// store.enqueue(vec![("a", EnqueueOptions::priority(9)), ("b", EnqueueOptions::default())]);
/// assert_eq!(store.dequeue(), Some("a"));
/// assert_eq!(store.dequeue(), Some("b"));
/// assert_eq!(store.dequeue(), None);
/// ```
#[derive(Debug)]
pub struct FifoStore<T> {
    items: VecDeque<T>,
}

impl<T> FifoStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Default for FifoStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> OrderedStore<T> for FifoStore<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn enqueue(&mut self, items: Vec<(T, EnqueueOptions)>) {
        self.items.extend(items.into_iter().map(|(item, _)| item));
    }

    fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T>(items: impl IntoIterator<Item = T>) -> Vec<(T, EnqueueOptions)> {
        items
            .into_iter()
            .map(|i| (i, EnqueueOptions::default()))
            .collect()
    }

    #[test]
    fn dequeue_follows_enqueue_order() {
        let mut store = FifoStore::new();
        store.enqueue(plain([1, 2, 3]));
        store.enqueue(plain([4, 5]));

        let drained: Vec<_> = std::iter::from_fn(|| store.dequeue()).collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn priority_hints_are_ignored() {
        let mut store = FifoStore::new();
        store.enqueue(vec![
            ("low", EnqueueOptions::priority(-5)),
            ("high", EnqueueOptions::priority(100)),
        ]);
        assert_eq!(store.dequeue(), Some("low"));
        assert_eq!(store.dequeue(), Some("high"));
    }

    #[test]
    fn len_tracks_mutations() {
        let mut store = FifoStore::new();
        assert!(store.is_empty());
        store.enqueue(plain(["x", "y"]));
        assert_eq!(store.len(), 2);
        store.dequeue();
        assert_eq!(store.len(), 1);
        store.dequeue();
        assert_eq!(store.dequeue(), None);
        assert_eq!(store.len(), 0);
    }
}
