use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Which end of the value distribution a [`Tail`] retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Low,
    High,
}

/// Heap entry ordered so that the top of the heap is the least extreme
/// retained value, i.e. the first one to be evicted.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    side: Side,
    value: f64,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Ranked {}
impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.side {
            Side::Low => self.value.total_cmp(&other.value),
            Side::High => other.value.total_cmp(&self.value),
        }
    }
}

/// Fixed-capacity collection of the most extreme values seen on one side.
///
/// A `Low` tail keeps the `capacity` smallest values inserted so far, a
/// `High` tail the `capacity` largest. Insertion is `O(log capacity)`.
#[derive(Debug, Clone)]
pub struct Tail {
    side: Side,
    capacity: usize,
    heap: BinaryHeap<Ranked>,
}

impl Tail {
    pub fn new(side: Side, capacity: usize) -> Self {
        Self {
            side,
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }
    pub fn side(&self) -> Side {
        self.side
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    /// The retained value closest to eviction, if any.
    pub fn boundary(&self) -> Option<f64> {
        self.heap.peek().map(|r| r.value)
    }
    /// Offer a value; it is kept only if it is more extreme than the current boundary.
    pub fn insert(&mut self, value: f64) {
        let ranked = Ranked {
            side: self.side,
            value,
        };
        if self.heap.len() < self.capacity {
            self.heap.push(ranked);
        } else if self.heap.peek().is_some_and(|top| ranked < *top) {
            self.heap.pop();
            self.heap.push(ranked);
        }
    }
    /// Retained values in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<f64> {
        let mut values = self.heap.iter().map(|r| r.value).collect::<Vec<f64>>();
        values.sort_by(f64::total_cmp);
        values
    }
}
