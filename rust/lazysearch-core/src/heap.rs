use std::rc::Rc;

use crate::queue::{PriorityQueue, QueueElement, QueueError};

/// Smallest backing capacity a heap is created with.
pub const MIN_CAPACITY: usize = 16;

/// Array-backed binary min-heap with element-tracked positions.
///
/// Every member knows its own slot (`QueueElement::position`), which gives
/// O(1) `contains` and O(log n) `change_priority` without an auxiliary map.
///
/// Layout is the usual 0-indexed one: the children of slot `i` are `2i + 1`
/// and `2i + 2`, its parent is `(i - 1) / 2`. After every public operation
/// `slots[i].priority() <= slots[child].priority()` holds for each occupied
/// child, and `slots[e.position()] == e` holds for each member `e`.
///
/// Priorities are compared with `<` / `>`; a NaN priority never moves and
/// silently breaks ordering, so callers must not produce one.
pub struct BinaryHeap<E: QueueElement> {
    slots: Vec<Rc<E>>,
}

impl<E: QueueElement> BinaryHeap<E> {
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Creates a heap sized for roughly `capacity` elements. Too small only
    /// costs reallocation, too large only costs memory.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity.max(MIN_CAPACITY)) }
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    // Grow by half again instead of letting Vec double.
    fn reserve_slot(&mut self) {
        let cap = self.slots.capacity();
        if self.slots.len() == cap {
            let extra = (cap / 2).max(MIN_CAPACITY);
            self.slots.reserve_exact(extra);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.slots[a].set_position(Some(a));
        self.slots[b].set_position(Some(b));
    }

    /// Moves the element at `index` towards the root while its parent is larger.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[parent].priority() > self.slots[index].priority() {
                self.swap(parent, index);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Moves the element at `index` towards the leaves while a child is smaller.
    fn heapify(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.slots[left].priority() < self.slots[smallest].priority() {
                smallest = left;
            }
            if right < len && self.slots[right].priority() < self.slots[smallest].priority() {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<E: QueueElement> Default for BinaryHeap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: QueueElement> PriorityQueue<E> for BinaryHeap<E> {
    /// Inserting an element that is already a member does not add a second
    /// slot; it repositions the existing one for its current priority.
    fn insert(&mut self, element: Rc<E>) {
        debug_assert!(!element.priority().is_nan(), "NaN priority");
        if let Some(index) = element.position().filter(|_| self.contains(&element)) {
            self.sift_up(index);
            if let Some(index) = element.position() {
                self.heapify(index);
            }
            return;
        }
        self.reserve_slot();
        let index = self.slots.len();
        element.set_position(Some(index));
        self.slots.push(element);
        // A fresh element behaves like a decrease-key from +infinity.
        self.sift_up(index);
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn min(&self) -> Result<&Rc<E>, QueueError> {
        self.slots.first().ok_or(QueueError::EmptyQueue)
    }

    fn extract_min(&mut self) -> Result<Rc<E>, QueueError> {
        if self.slots.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        let min = self.slots.swap_remove(0);
        if let Some(first) = self.slots.first() {
            first.set_position(Some(0));
            self.heapify(0);
        }
        min.set_position(None);
        Ok(min)
    }

    fn change_priority(&mut self, element: &Rc<E>, priority: f64) -> Result<(), QueueError> {
        debug_assert!(!priority.is_nan(), "NaN priority");
        let index = match element.position() {
            Some(index) if self.contains(element) => index,
            _ => return Err(QueueError::ElementNotPresent),
        };
        let old = element.priority();
        element.set_priority(priority);
        if priority <= old {
            self.sift_up(index);
        } else {
            self.heapify(index);
        }
        Ok(())
    }

    fn contains(&self, element: &Rc<E>) -> bool {
        element
            .position()
            .and_then(|index| self.slots.get(index))
            .is_some_and(|slot| Rc::ptr_eq(slot, element))
    }

    fn to_vec(&self) -> Vec<Rc<E>> {
        self.slots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Item {
        id: u32,
        priority: Cell<f64>,
        position: Cell<Option<usize>>,
    }

    impl QueueElement for Item {
        fn priority(&self) -> f64 {
            self.priority.get()
        }

        fn set_priority(&self, priority: f64) {
            self.priority.set(priority)
        }

        fn position(&self) -> Option<usize> {
            self.position.get()
        }

        fn set_position(&self, position: Option<usize>) {
            self.position.set(position)
        }
    }

    fn item(id: u32, priority: f64) -> Rc<Item> {
        Rc::new(Item { id, priority: Cell::new(priority), position: Cell::new(None) })
    }

    fn assert_invariants(heap: &BinaryHeap<Item>) {
        let slots = heap.to_vec();
        for (i, e) in slots.iter().enumerate() {
            assert_eq!(e.position(), Some(i), "position of id {} out of sync", e.id);
            for child in [2 * i + 1, 2 * i + 2] {
                if let Some(c) = slots.get(child) {
                    assert!(e.priority() <= c.priority(), "heap order broken at {i}->{child}");
                }
            }
        }
    }

    #[test]
    fn empty_heap_reports_empty_queue() {
        let mut heap: BinaryHeap<Item> = BinaryHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.min().err(), Some(QueueError::EmptyQueue));
        assert_eq!(heap.extract_min().err(), Some(QueueError::EmptyQueue));
    }

    #[test]
    fn extracts_in_priority_order() {
        let mut heap = BinaryHeap::new();
        for (id, p) in [(1, 5.0), (2, 1.0), (3, 3.0), (4, 4.0), (5, 2.0)] {
            heap.insert(item(id, p));
            assert_invariants(&heap);
        }
        let mut out = Vec::new();
        while let Ok(e) = heap.extract_min() {
            assert_eq!(e.position(), None);
            assert_invariants(&heap);
            out.push(e.id);
        }
        assert_eq!(out, vec![2, 5, 3, 4, 1]);
    }

    #[test]
    fn min_does_not_remove() {
        let mut heap = BinaryHeap::new();
        heap.insert(item(7, 2.5));
        heap.insert(item(8, 0.5));
        assert_eq!(heap.min().unwrap().id, 8);
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn decrease_and_increase_key_reposition() {
        let mut heap = BinaryHeap::new();
        let a = item(1, 10.0);
        let b = item(2, 20.0);
        let c = item(3, 30.0);
        heap.insert(a.clone());
        heap.insert(b.clone());
        heap.insert(c.clone());

        heap.change_priority(&c, 1.0).unwrap();
        assert_invariants(&heap);
        assert_eq!(heap.min().unwrap().id, 3);

        heap.change_priority(&c, 25.0).unwrap();
        assert_invariants(&heap);
        assert_eq!(heap.min().unwrap().id, 1);
        assert_eq!(c.priority(), 25.0);
    }

    #[test]
    fn change_priority_rejects_non_members() {
        let mut heap = BinaryHeap::new();
        let member = item(1, 1.0);
        let stranger = item(2, 2.0);
        heap.insert(member.clone());
        assert_eq!(heap.change_priority(&stranger, 0.0), Err(QueueError::ElementNotPresent));

        // Same slot number but a different allocation is still not a member.
        stranger.set_position(Some(0));
        assert!(!heap.contains(&stranger));
        assert_eq!(heap.change_priority(&stranger, 0.0), Err(QueueError::ElementNotPresent));

        let extracted = heap.extract_min().unwrap();
        assert!(!heap.contains(&extracted));
        assert_eq!(heap.change_priority(&extracted, 0.0), Err(QueueError::ElementNotPresent));
    }

    #[test]
    fn inserting_a_member_twice_keeps_one_slot() {
        let mut heap = BinaryHeap::new();
        let a = item(1, 3.0);
        let b = item(2, 2.0);
        heap.insert(a.clone());
        heap.insert(b.clone());
        heap.insert(a.clone());
        assert_eq!(heap.len(), 2);
        assert_invariants(&heap);

        // Re-inserting after an out-of-band priority change restores order.
        a.set_priority(1.0);
        heap.insert(a.clone());
        assert_eq!(heap.len(), 2);
        assert_invariants(&heap);
        assert_eq!(heap.extract_min().unwrap().id, 1);
        assert_eq!(heap.extract_min().unwrap().id, 2);
        assert!(heap.is_empty());
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut heap = BinaryHeap::with_capacity(0);
        assert!(heap.capacity() >= MIN_CAPACITY);
        for i in 0..100u32 {
            heap.insert(item(i, f64::from(100 - i)));
        }
        assert_eq!(heap.len(), 100);
        assert!(heap.capacity() >= 100);
        assert_invariants(&heap);
        assert_eq!(heap.extract_min().unwrap().id, 99);
    }

    #[test]
    fn equal_priorities_are_all_returned() {
        let mut heap = BinaryHeap::new();
        for i in 0..5 {
            heap.insert(item(i, 1.0));
        }
        let mut ids: Vec<u32> =
            std::iter::from_fn(|| heap.extract_min().ok()).map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }
}
