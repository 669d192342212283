//! Bounded smallest-K selection.
//!
//! A max-heap capped at `capacity`: every push beyond capacity evicts the
//! current largest distance, so only the `capacity` smallest survive.
//! Among equal distances the most recently pushed entry is evicted first, so
//! earlier candidates win ties.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    distance: f32,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Keeps the `capacity` items with the smallest distances.
#[derive(Debug)]
pub struct BoundedTopK<T> {
    capacity: usize,
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> BoundedTopK<T> {
    /// Create an empty selection retaining at most `capacity` items.
    ///
    /// Storage grows with the items actually pushed, so `capacity` may be
    /// far larger than the candidate set.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Offer a candidate; evicts the worst entry once over capacity.
    pub fn push(&mut self, item: T, distance: f32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            distance,
            seq,
            item,
        });
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Number of retained items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest retained distance, if any.
    #[must_use]
    pub fn worst_distance(&self) -> Option<f32> {
        self.heap.peek().map(|e| e.distance)
    }

    /// Retained items ordered by ascending distance, ties in insertion order.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<(T, f32)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|e| (e.item, e.distance))
            .collect()
    }
}
