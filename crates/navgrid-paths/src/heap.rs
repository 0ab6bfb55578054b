//! Binary heap with a position side-table.
//!
//! [`IndexedHeap`] behaves like `BinaryHeap` (the greatest item per `Ord`
//! comes out first) but additionally remembers where every item sits, so
//! membership tests are O(1) and an item whose priority changed can be
//! re-sifted in place instead of pushed again.

use crate::error::PathError;

/// An item that can live in an [`IndexedHeap`].
///
/// `Ord` decides priority: the greater item wins. The key must be unique
/// among items in the heap and smaller than the heap's capacity.
pub trait HeapItem: Ord {
    fn heap_key(&self) -> usize;
}

const VACANT: usize = usize::MAX;

/// Fixed-capacity max-heap keyed by [`HeapItem::heap_key`].
///
/// The side-table `slots[key]` holds the array position of the item with
/// that key. For every contained item, `items[slots[item.heap_key()]]` is
/// that item.
#[derive(Debug, Clone)]
pub struct IndexedHeap<T: HeapItem> {
    items: Vec<T>,
    slots: Vec<usize>,
}

impl<T: HeapItem> IndexedHeap<T> {
    /// Create an empty heap accepting keys in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: vec![VACANT; capacity],
        }
    }

    /// Largest number of items the heap can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The highest-priority item, if any.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// The item currently stored under `key`.
    pub fn get(&self, key: usize) -> Option<&T> {
        let slot = *self.slots.get(key)?;
        self.items.get(slot).filter(|item| item.heap_key() == key)
    }

    /// Whether an item with this key is in the heap.
    #[inline]
    pub fn contains_key(&self, key: usize) -> bool {
        self.get(key).is_some()
    }

    /// Whether `item`'s key is in the heap.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.contains_key(item.heap_key())
    }

    /// Add an item and restore heap order.
    ///
    /// # Panics
    ///
    /// If the key is outside the capacity or already present.
    pub fn insert(&mut self, item: T) {
        let key = item.heap_key();
        assert!(
            key < self.capacity(),
            "heap key {key} exceeds capacity {}",
            self.capacity()
        );
        assert!(!self.contains_key(key), "heap key {key} inserted twice");

        let slot = self.items.len();
        self.items.push(item);
        self.slots[key] = slot;
        self.sift_up(slot);
    }

    /// Remove and return the highest-priority item.
    pub fn extract_best(&mut self) -> Result<T, PathError> {
        if self.items.is_empty() {
            return Err(PathError::EmptyQueue);
        }
        let best = self.items.swap_remove(0);
        self.slots[best.heap_key()] = VACANT;
        if let Some(first) = self.items.first() {
            self.slots[first.heap_key()] = 0;
            self.sift_down(0);
        }
        Ok(best)
    }

    /// Replace the stored item that has the same key as `item` and move it
    /// to where its new priority belongs.
    ///
    /// # Panics
    ///
    /// If no item with that key is in the heap.
    pub fn update_item(&mut self, item: T) {
        let key = item.heap_key();
        assert!(self.contains_key(key), "heap key {key} updated but absent");
        let slot = self.slots[key];
        self.items[slot] = item;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
    }

    /// Drop every item, keeping the capacity.
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            self.slots[item.heap_key()] = VACANT;
        }
    }

    // -----------------------------------------------------------------------
    // Sifting
    // -----------------------------------------------------------------------

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.items[slot] > self.items[parent] {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                return;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.items[right] > self.items[left] {
                child = right;
            }
            if self.items[child] > self.items[slot] {
                self.swap(slot, child);
                slot = child;
            } else {
                return;
            }
        }
    }

    /// Exchange two array slots together with their side-table entries.
    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.slots[self.items[a].heap_key()] = a;
        self.slots[self.items[b].heap_key()] = b;
    }
}
