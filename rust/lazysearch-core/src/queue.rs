use std::rc::Rc;

use thiserror::Error;

/// Something that can sit in an indexed priority queue.
///
/// The queue writes the priority and the slot index back into the element
/// itself, so both accessors take `&self` and implementations are expected
/// to use interior mutability (`Cell`). Elements are shared through `Rc`;
/// membership is decided by pointer identity, never by value equality.
pub trait QueueElement {
    fn priority(&self) -> f64;
    fn set_priority(&self, priority: f64);

    /// Current slot in the queue's backing array, `None` when not enqueued.
    fn position(&self) -> Option<usize>;
    fn set_position(&self, position: Option<usize>);
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("priority queue is empty")]
    EmptyQueue,
    #[error("element is not a member of this priority queue")]
    ElementNotPresent,
}

/// Min-priority queue over shared elements.
pub trait PriorityQueue<E: QueueElement> {
    /// Adds `element`, taking its current `priority()` as the key. An element
    /// that is already a member keeps its single slot and is repositioned.
    fn insert(&mut self, element: Rc<E>);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Minimum-priority element without removing it.
    fn min(&self) -> Result<&Rc<E>, QueueError>;

    /// Removes and returns the minimum-priority element. Its position is
    /// reset to `None`.
    fn extract_min(&mut self) -> Result<Rc<E>, QueueError>;

    /// Updates the priority of a member and restores heap order around it.
    fn change_priority(&mut self, element: &Rc<E>, priority: f64) -> Result<(), QueueError>;

    /// O(1) identity membership test.
    fn contains(&self, element: &Rc<E>) -> bool;

    /// Unordered snapshot of the members. Slot order is an implementation
    /// detail; do not read priorities off it.
    fn to_vec(&self) -> Vec<Rc<E>>;
}
