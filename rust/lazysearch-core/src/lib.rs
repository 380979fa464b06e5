pub mod error;
pub mod heap;
pub mod node;
pub mod options;
pub mod queue;
pub mod search;
pub mod state;

pub use error::OptionsError;
pub use heap::BinaryHeap;
pub use node::SearchNode;
pub use options::SearchOptions;
pub use queue::{PriorityQueue, QueueElement, QueueError};
pub use search::{LazySearch, SearchStats, Termination};
pub use state::{HeuristicState, State, ZeroHeuristic};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
