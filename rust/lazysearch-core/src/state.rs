/// A point in an implicitly defined graph.
///
/// Successors are produced lazily: the engine pulls only as many as it
/// expands, so an implementation may describe very large or unbounded
/// fan-out. Transition costs must be non-negative.
pub trait State: Sized {
    fn is_final(&self) -> bool;

    /// Outgoing edges as `(neighbor, transition_cost)` pairs.
    fn next_states(&self) -> impl Iterator<Item = (Self, f64)> + '_;
}

/// A state that can estimate its remaining cost to any final state.
///
/// The estimate must be admissible (never above the true minimal remaining
/// cost) for results to come out in non-decreasing cost order. A constant
/// zero is always admissible.
pub trait HeuristicState: State {
    fn completion_cost(&self) -> f64;
}

/// Lifts a plain [`State`] into a [`HeuristicState`] with a zero estimate,
/// which turns the engine into uniform-cost search.
#[derive(Clone, Debug, PartialEq)]
pub struct ZeroHeuristic<S>(pub S);

impl<S> ZeroHeuristic<S> {
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S: State> State for ZeroHeuristic<S> {
    fn is_final(&self) -> bool {
        self.0.is_final()
    }

    fn next_states(&self) -> impl Iterator<Item = (Self, f64)> + '_ {
        self.0.next_states().map(|(s, cost)| (ZeroHeuristic(s), cost))
    }
}

impl<S: State> HeuristicState for ZeroHeuristic<S> {
    fn completion_cost(&self) -> f64 {
        0.0
    }
}
