//! Bounded FIFO buffer
//!
//! [`SeriesBuffer`] is the building block of every rolling window in the
//! store: a fixed-capacity ring that evicts its oldest element to admit a new
//! one once full.

use std::collections::VecDeque;

/// Default number of samples kept per window
pub const DEFAULT_CAPACITY: usize = 20;

/// Fixed-capacity, chronologically ordered sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> SeriesBuffer<T> {
    /// Create an empty buffer
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "series buffer capacity must be positive");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting and returning the oldest one if full
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(value);
        evicted
    }

    /// Number of values currently held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no values
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the next push will evict
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Maximum number of values held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Most recently appended value
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> SeriesBuffer<T> {
    /// Copy the contents out, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}
