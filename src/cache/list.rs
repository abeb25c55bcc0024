//! Recency List Module
//!
//! Doubly-linked access-order list stored in an arena of slots.

// == Handle ==
/// Stable position of an item inside a [`RecencyList`].
///
/// A handle stays valid until its item is removed. Slots are recycled, so a
/// handle must not be reused after `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// Null link.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// Items live in a `Vec` of slots linked by index:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Push-front, move-to-front and remove-by-handle are all O(1).
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacated slots, reused before the arena grows
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as the most recently used and returns its handle.
    pub fn push_front(&mut self, item: T) -> Handle {
        let slot = Slot {
            item: Some(item),
            prev: NIL,
            next: NIL,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Move To Front ==
    /// Marks an item as most recently used.
    pub fn move_to_front(&mut self, handle: Handle) {
        let idx = handle.0;
        if !self.is_live(idx) || self.head == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks an item and hands it back. Returns None for a stale handle.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let idx = handle.0;
        if !self.is_live(idx) {
            return None;
        }
        self.unlink(idx);
        self.len -= 1;
        self.free.push(idx);
        self.slots[idx].item.take()
    }

    // == Back ==
    /// Handle of the least recently used item.
    pub fn back(&self) -> Option<Handle> {
        (self.tail != NIL).then_some(Handle(self.tail))
    }

    // == Access ==
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0).and_then(|slot| slot.item.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .and_then(|slot| slot.item.as_mut())
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn is_live(&self, idx: usize) -> bool {
        self.slots
            .get(idx)
            .map_or(false, |slot| slot.item.is_some())
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let slot = &self.list.slots[self.cursor];
        self.cursor = slot.next;
        self.remaining -= 1;
        slot.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
