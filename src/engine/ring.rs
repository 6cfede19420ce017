//! # engine::ring
//!
//! Fixed-capacity ring buffer holding the visible candle history.
//!
//! Storage is allocated once; once full, every push overwrites the oldest slot
//! and advances `head`. Logical index 0 is always the oldest element.

/// Keeps the most recent `capacity` elements.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots:    Vec<T>,
    capacity: usize,
    /// Slot holding the oldest element once the buffer is full.
    head:     usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append `item`, returning the evicted oldest element when full.
    ///
    /// A zero-capacity buffer hands `item` straight back.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        if self.slots.len() < self.capacity {
            self.slots.push(item);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], item);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn physical(&self, logical: usize) -> usize {
        if self.slots.len() < self.capacity {
            logical
        } else {
            (self.head + logical) % self.capacity
        }
    }

    /// Element at logical position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.slots.len() {
            return None;
        }
        self.slots.get(self.physical(index))
    }

    /// Element `n` places back from the newest (0 = newest).
    pub fn nth_back(&self, n: usize) -> Option<&T> {
        let len = self.slots.len();
        if n >= len {
            return None;
        }
        self.get(len - 1 - n)
    }

    pub fn last(&self) -> Option<&T> {
        self.nth_back(0)
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        let len = self.slots.len();
        if len == 0 {
            return None;
        }
        let slot = self.physical(len - 1);
        self.slots.get_mut(slot)
    }

    /// Oldest-to-newest iteration without copying.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = if self.slots.len() < self.capacity {
            (&self.slots[..], &self.slots[..0])
        } else {
            self.slots.split_at(self.head)
        };
        older.iter().chain(newer.iter())
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Ordered copy of the contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_below_capacity_keeps_order() {
        let mut ring = RingBuffer::new(3);
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.to_vec(), vec![1, 2]);
        assert_eq!(ring.last(), Some(&2));
    }

    #[test]
    fn test_push_past_capacity_evicts_oldest() {
        let mut ring = RingBuffer::new(3);
        for i in 1..=3 {
            ring.push(i);
        }
        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.push(5), Some(2));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec![3, 4, 5]);
        assert_eq!(ring.get(0), Some(&3));
        assert_eq!(ring.nth_back(0), Some(&5));
        assert_eq!(ring.nth_back(2), Some(&3));
        assert_eq!(ring.nth_back(3), None);
    }

    #[test]
    fn test_last_mut_targets_newest_after_wrap() {
        let mut ring = RingBuffer::new(2);
        for i in 0..5 {
            ring.push(i);
        }
        if let Some(last) = ring.last_mut() {
            *last = 40;
        }
        assert_eq!(ring.to_vec(), vec![3, 40]);
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut ring = RingBuffer::new(0);
        assert_eq!(ring.push(7), Some(7));
        assert!(ring.is_empty());
        assert!(ring.last_mut().is_none());
        assert_eq!(ring.iter().count(), 0);
    }
}
