use std::collections::VecDeque;

use crate::time::Time;

/// A bounded FIFO of customer arrival timestamps.
///
/// Customers are only ever admitted; nothing is served out of the buffer, so `capacity` bounds
/// the number of customers a station accepts over the whole run.
#[derive(Debug, Clone, derive_new::new)]
pub struct Buffer {
    capacity: usize,
    #[new(default)]
    inner: VecDeque<Time>,
}

impl Buffer {
    delegate::delegate! {
        to self.inner {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
            #[call(front)]
            pub fn oldest(&self) -> Option<&Time>;
            pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Time>;
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.capacity
    }

    /// Appends `arrival` if there is room. Returns `false`, leaving the buffer untouched, when
    /// the buffer is already at capacity.
    #[must_use]
    pub fn admit(&mut self, arrival: Time) -> bool {
        if self.is_full() {
            return false;
        }
        self.inner.push_back(arrival);
        true
    }
}
