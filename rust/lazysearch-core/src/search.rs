use std::iter::FusedIterator;
use std::mem;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::heap::BinaryHeap;
use crate::node::SearchNode;
use crate::options::SearchOptions;
use crate::queue::{PriorityQueue, QueueElement};
use crate::state::HeuristicState;

/// Why a search stopped producing answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The frontier ran dry.
    Exhausted,
    /// `max_expansions` was reached before another answer was found.
    ExpansionBudget,
    /// `max_results` answers were already produced.
    ResultBudget,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: u64,
    pub generated: u64,
    pub yielded: u64,
    pub frontier_len: usize,
    pub frontier_high_water: usize,
}

enum Lookahead<S> {
    NotComputed,
    Ready(Rc<SearchNode<S>>),
    Exhausted,
}

/// Lazy best-first enumeration of final nodes.
///
/// Seeded with one or more start states, the search repeatedly pulls the
/// frontier node with the lowest `cost + completion_cost()`. Final nodes are
/// handed to the caller; every other node is expanded and its children go
/// back on the frontier. With admissible estimates the answers come out in
/// non-decreasing cost order.
///
/// There is no closed set. A state reachable along several paths is
/// expanded, and if final yielded, once per path, which is what makes k-best
/// enumeration work. On cyclic graphs or graphs with unbounded path
/// multiplicity the search may never run dry; bound it with
/// [`SearchOptions::max_expansions`] or stop pulling.
///
/// One call to [`Iterator::next`] or [`LazySearch::has_next`] may do an
/// arbitrary amount of heap work before it returns.
pub struct LazySearch<S: HeuristicState> {
    heap: BinaryHeap<SearchNode<S>>,
    lookahead: Lookahead<S>,
    options: SearchOptions,
    stats: SearchStats,
    termination: Option<Termination>,
}

impl<S: HeuristicState> LazySearch<S> {
    /// Starts a search from `initial` with a heap sized for `capacity_hint`.
    pub fn new<I>(initial: I, capacity_hint: usize) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Self::with_options(initial, SearchOptions { capacity_hint, ..SearchOptions::default() })
    }

    pub fn with_options<I>(initial: I, options: SearchOptions) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut heap = BinaryHeap::with_capacity(options.capacity_hint);
        for state in initial {
            let root = Rc::new(SearchNode::root(state));
            root.set_priority(root.completion_cost());
            heap.insert(root);
        }
        let stats = SearchStats { frontier_high_water: heap.len(), ..SearchStats::default() };
        debug!(
            roots = heap.len(),
            capacity = heap.capacity(),
            bounded = !options.unbounded(),
            "search_seeded"
        );
        Self { heap, lookahead: Lookahead::NotComputed, options, stats, termination: None }
    }

    /// Whether another answer exists. Runs the search only if no answer is
    /// already cached, so repeated calls are cheap.
    pub fn has_next(&mut self) -> bool {
        self.fill();
        matches!(self.lookahead, Lookahead::Ready(_))
    }

    /// The next answer, without consuming it.
    pub fn peek(&mut self) -> Option<&Rc<SearchNode<S>>> {
        self.fill();
        match &self.lookahead {
            Lookahead::Ready(node) => Some(node),
            _ => None,
        }
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats { frontier_len: self.heap.len(), ..self.stats }
    }

    pub fn frontier_len(&self) -> usize {
        self.heap.len()
    }

    /// `None` while answers may still follow.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    fn fill(&mut self) {
        if let Lookahead::NotComputed = self.lookahead {
            self.lookahead = match self.search() {
                Some(node) => Lookahead::Ready(node),
                None => Lookahead::Exhausted,
            };
        }
    }

    fn search(&mut self) -> Option<Rc<SearchNode<S>>> {
        if self.options.max_results.is_some_and(|max| self.stats.yielded >= max as u64) {
            debug!(yielded = self.stats.yielded, "search_result_budget_reached");
            self.termination = Some(Termination::ResultBudget);
            return None;
        }

        while let Ok(node) = self.heap.extract_min() {
            if node.is_final() {
                self.stats.yielded += 1;
                debug!(
                    cost = node.cost(),
                    depth = node.depth(),
                    expanded = self.stats.expanded,
                    frontier = self.heap.len(),
                    "search_answer"
                );
                return Some(node);
            }

            if self.options.max_expansions.is_some_and(|max| self.stats.expanded >= max) {
                warn!(
                    expanded = self.stats.expanded,
                    frontier = self.heap.len(),
                    "search_expansion_budget_reached"
                );
                self.termination = Some(Termination::ExpansionBudget);
                return None;
            }

            self.stats.expanded += 1;
            let mut children = 0u64;
            for child in node.expand() {
                child.set_priority(child.estimated_total());
                self.heap.insert(child);
                children += 1;
            }
            self.stats.generated += children;
            self.stats.frontier_high_water = self.stats.frontier_high_water.max(self.heap.len());
            trace!(
                cost = node.cost(),
                priority = node.priority(),
                children,
                frontier = self.heap.len(),
                "search_expand"
            );
        }

        debug!(
            expanded = self.stats.expanded,
            yielded = self.stats.yielded,
            "search_exhausted"
        );
        self.termination = Some(Termination::Exhausted);
        None
    }
}

impl<S: HeuristicState> Iterator for LazySearch<S> {
    type Item = Rc<SearchNode<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fill();
        match mem::replace(&mut self.lookahead, Lookahead::NotComputed) {
            Lookahead::Ready(node) => Some(node),
            other => {
                self.lookahead = other;
                None
            }
        }
    }
}

impl<S: HeuristicState> FusedIterator for LazySearch<S> {}
