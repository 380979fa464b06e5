use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::queue::QueueElement;
use crate::state::{HeuristicState, State};

/// A node of the implicit search tree.
///
/// Each node wraps one graph state reached along one specific path. The same
/// state reached along two paths yields two nodes. `cost` is fixed at
/// construction; only `priority` and `position` change afterwards, and only
/// through the priority queue.
///
/// Parent links point towards the root, so following them from any node
/// reconstructs the path that produced it.
pub struct SearchNode<S> {
    state: S,
    cost: f64,
    depth: usize,
    parent: Option<Rc<SearchNode<S>>>,
    priority: Cell<f64>,
    position: Cell<Option<usize>>,
}

impl<S> SearchNode<S> {
    /// Root node: cost 0, no parent, priority not yet set.
    pub fn root(state: S) -> Self {
        Self::new(state, None, 0.0)
    }

    fn new(state: S, parent: Option<Rc<SearchNode<S>>>, cost: f64) -> Self {
        let depth = parent.as_ref().map_or(0, |p| p.depth + 1);
        Self {
            state,
            cost,
            depth,
            parent,
            priority: Cell::new(f64::INFINITY),
            position: Cell::new(None),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Accumulated path cost from the root.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of edges between this node and its root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<&Rc<SearchNode<S>>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// This node, then its parent, up to and including the root.
    pub fn ancestors(&self) -> Ancestors<'_, S> {
        Ancestors { next: Some(self) }
    }

    /// States along the path from the root to this node.
    pub fn path(&self) -> Vec<&S> {
        let mut states: Vec<&S> = self.ancestors().map(SearchNode::state).collect();
        states.reverse();
        states
    }
}

impl<S: State> SearchNode<S> {
    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }

    /// Lazily creates one child per outgoing edge of the wrapped state.
    ///
    /// Children are built only as the iterator is advanced; abandoning it
    /// early leaves the remaining edges unexplored. A child's priority is
    /// left at +infinity for the caller to set.
    pub fn expand(self: &Rc<Self>) -> impl Iterator<Item = Rc<SearchNode<S>>> + '_ {
        self.state.next_states().map(move |(state, edge_cost)| {
            debug_assert!(edge_cost >= 0.0, "negative transition cost {edge_cost}");
            Rc::new(SearchNode::new(state, Some(Rc::clone(self)), self.cost + edge_cost))
        })
    }
}

impl<S: HeuristicState> SearchNode<S> {
    pub fn completion_cost(&self) -> f64 {
        self.state.completion_cost()
    }

    /// Accumulated cost plus the admissible remaining-cost estimate.
    pub fn estimated_total(&self) -> f64 {
        self.cost + self.completion_cost()
    }
}

impl<S> QueueElement for SearchNode<S> {
    fn priority(&self) -> f64 {
        self.priority.get()
    }

    fn set_priority(&self, priority: f64) {
        self.priority.set(priority);
    }

    fn position(&self) -> Option<usize> {
        self.position.get()
    }

    fn set_position(&self, position: Option<usize>) {
        self.position.set(position);
    }
}

impl<S: fmt::Debug> fmt::Debug for SearchNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchNode")
            .field("state", &self.state)
            .field("cost", &self.cost)
            .field("depth", &self.depth)
            .field("priority", &self.priority.get())
            .field("position", &self.position.get())
            .finish_non_exhaustive()
    }
}

// Unlink the parent chain iteratively so that dropping the last handle on a
// deep path does not recurse once per ancestor.
impl<S> Drop for SearchNode<S> {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut inner) => next = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

pub struct Ancestors<'a, S> {
    next: Option<&'a SearchNode<S>>,
}

impl<'a, S> Iterator for Ancestors<'a, S> {
    type Item = &'a SearchNode<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    // Line graph 0 -> 1 -> ... -> len, each edge costs 1.5.
    #[derive(Debug, Clone, PartialEq)]
    struct Step {
        at: u32,
        len: u32,
    }

    impl State for Step {
        fn is_final(&self) -> bool {
            self.at == self.len
        }

        fn next_states(&self) -> impl Iterator<Item = (Self, f64)> + '_ {
            (self.at < self.len)
                .then(|| (Step { at: self.at + 1, len: self.len }, 1.5))
                .into_iter()
        }
    }

    impl HeuristicState for Step {
        fn completion_cost(&self) -> f64 {
            f64::from(self.len - self.at)
        }
    }

    // Fan-out state that records how many children were materialised.
    struct Fan<'a> {
        width: u32,
        pulled: &'a RefCell<u32>,
    }

    impl<'a> State for Fan<'a> {
        fn is_final(&self) -> bool {
            false
        }

        fn next_states(&self) -> impl Iterator<Item = (Self, f64)> + '_ {
            (0..self.width).map(move |i| {
                *self.pulled.borrow_mut() += 1;
                (Fan { width: 0, pulled: self.pulled }, f64::from(i))
            })
        }
    }

    #[test]
    fn root_has_zero_cost_and_no_parent() {
        let root = SearchNode::root(Step { at: 0, len: 3 });
        assert_eq!(root.cost(), 0.0);
        assert_eq!(root.depth(), 0);
        assert!(root.is_root());
        assert_eq!(root.priority(), f64::INFINITY);
        assert_eq!(root.position(), None);
        assert_eq!(root.estimated_total(), 3.0);
    }

    #[test]
    fn expansion_accumulates_cost_and_links_parent() {
        let root = Rc::new(SearchNode::root(Step { at: 0, len: 2 }));
        let child = root.expand().next().unwrap();
        assert_eq!(child.cost(), 1.5);
        assert_eq!(child.depth(), 1);
        assert!(Rc::ptr_eq(child.parent().unwrap(), &root));

        let grandchild = child.expand().next().unwrap();
        assert_eq!(grandchild.cost(), 3.0);
        assert!(grandchild.is_final());
        assert_eq!(grandchild.completion_cost(), 0.0);
        assert!(child.expand().nth(1).is_none());
        assert!(grandchild.expand().next().is_none());
    }

    #[test]
    fn path_runs_root_to_node() {
        let root = Rc::new(SearchNode::root(Step { at: 0, len: 3 }));
        let mut node = root;
        loop {
            let next = node.expand().next();
            match next {
                Some(child) => node = child,
                None => break,
            }
        }
        let ats: Vec<u32> = node.path().iter().map(|s| s.at).collect();
        assert_eq!(ats, vec![0, 1, 2, 3]);
        assert_eq!(node.ancestors().count(), 4);
        assert!(node.ancestors().last().unwrap().is_root());
    }

    #[test]
    fn expansion_is_lazy() {
        let pulled = RefCell::new(0);
        let root = Rc::new(SearchNode::root(Fan { width: 10, pulled: &pulled }));
        let first_two: Vec<_> = root.expand().take(2).collect();
        assert_eq!(first_two.len(), 2);
        assert_eq!(*pulled.borrow(), 2);
        assert_eq!(first_two[1].cost(), 1.0);
    }

    #[test]
    fn dropping_a_deep_chain_does_not_overflow() {
        let mut node = Rc::new(SearchNode::root(Step { at: 0, len: 200_000 }));
        for _ in 0..200_000 {
            let next = node.expand().next().unwrap();
            node = next;
        }
        assert_eq!(node.depth(), 200_000);
        drop(node);
    }

    #[test]
    fn shared_parent_survives_child_drop() {
        let root = Rc::new(SearchNode::root(Step { at: 0, len: 5 }));
        let child = root.expand().next().unwrap();
        drop(child);
        assert_eq!(Rc::strong_count(&root), 1);
        assert_eq!(root.state().at, 0);
    }
}
