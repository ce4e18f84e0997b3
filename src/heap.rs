//! Indirect binary min-heap.
//!
//! Items live in an arena (`slots`) and the heap only reorders positions
//! that point into it. Keys are never stored: every comparison calls the
//! caller's key function, so a key lowered after insertion is seen the next
//! time that entry is compared.
//!
//! An item is held at most once. Inserting an item that is already held
//! re-sifts its entry instead of adding a second one: a lowered key left in
//! place would sit above its parent and could hide cheaper entries below it.
//! Callers must insert an item again after every change to its key.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};

const ROOT: usize = 1;

#[derive(Clone, Debug)]
pub struct IndirectMinHeap<T> {
    slots: Vec<T>,
    // heap position -> arena slot. Position 0 is unused so the root is 1.
    out_of: Vec<usize>,
    // arena slot -> heap position
    into: Vec<usize>,
    // item -> arena slot
    slot_of: HashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> Default for IndirectMinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> IndirectMinHeap<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut out_of = Vec::with_capacity(capacity + 1);
        out_of.push(usize::MAX);

        Self {
            slots: Vec::with_capacity(capacity),
            out_of,
            into: Vec::with_capacity(capacity),
            slot_of: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, item: T) -> bool {
        self.slot_of.contains_key(&item)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.slot_of.clear();
        self.into.clear();
        self.out_of.truncate(ROOT);
    }

    /// Adds `item` at the next free position and sifts it up. If `item` is
    /// already held, its entry is moved to match its current key instead.
    pub fn insert<K, F>(&mut self, item: T, key: F)
    where
        K: Ord,
        F: Fn(T) -> K,
    {
        if let Some(&slot) = self.slot_of.get(&item) {
            let pos = self.into[slot];
            self.sift_up(pos, &key);
            let pos = self.into[slot];
            self.sift_down(pos, &key);
            return;
        }

        let slot = self.slots.len();
        let pos = slot + 1;

        self.slots.push(item);
        self.into.push(pos);
        self.out_of.push(slot);
        self.slot_of.insert(item, slot);

        self.sift_up(pos, &key);
    }

    /// Removes and returns the item at the root.
    pub fn extract_min<K, F>(&mut self, key: F) -> Result<T>
    where
        K: Ord,
        F: Fn(T) -> K,
    {
        if self.is_empty() {
            return Err(Error::EmptyHeap);
        }

        let last = self.len();
        let root_slot = self.out_of[ROOT];
        let item = self.slots[root_slot];

        self.swap_positions(ROOT, last);
        self.out_of.pop();
        self.slot_of.remove(&item);

        // Compact the arena. swap_remove moves the last slot into the freed
        // one, so the position pointing at it has to follow.
        self.slots.swap_remove(root_slot);
        self.into.swap_remove(root_slot);
        if root_slot < self.slots.len() {
            self.out_of[self.into[root_slot]] = root_slot;
            self.slot_of.insert(self.slots[root_slot], root_slot);
        }

        if !self.is_empty() {
            self.sift_down(ROOT, &key);
        }

        Ok(item)
    }

    fn key_at<K, F>(&self, pos: usize, key: &F) -> K
    where
        F: Fn(T) -> K,
    {
        key(self.slots[self.out_of[pos]])
    }

    fn sift_up<K, F>(&mut self, mut child: usize, key: &F)
    where
        K: Ord,
        F: Fn(T) -> K,
    {
        while child > ROOT {
            let parent = child / 2;
            if self.key_at(child, key) >= self.key_at(parent, key) {
                break;
            }
            self.swap_positions(parent, child);
            child = parent;
        }
    }

    fn sift_down<K, F>(&mut self, mut parent: usize, key: &F)
    where
        K: Ord,
        F: Fn(T) -> K,
    {
        let len = self.len();

        loop {
            let left = parent * 2;
            let right = left + 1;

            if left > len {
                break;
            }

            let min = if right <= len && self.key_at(right, key) < self.key_at(left, key) {
                right
            } else {
                left
            };

            if self.key_at(min, key) >= self.key_at(parent, key) {
                break;
            }
            self.swap_positions(parent, min);
            parent = min;
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        self.out_of.swap(a, b);
        self.into[self.out_of[a]] = a;
        self.into[self.out_of[b]] = b;
    }

    #[cfg(test)]
    fn check_links(&self) {
        assert_eq!(self.out_of.len(), self.slots.len() + 1);
        assert_eq!(self.into.len(), self.slots.len());
        assert_eq!(self.slot_of.len(), self.slots.len());
        for (slot, &pos) in self.into.iter().enumerate() {
            assert_eq!(self.out_of[pos], slot);
            assert_eq!(self.slot_of[&self.slots[slot]], slot);
        }
    }
}
