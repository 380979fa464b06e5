use std::rc::Rc;

use lazysearch_core::{LazySearch, SearchOptions, Termination};
use serde::Serialize;
use tracing::info;

use crate::lattice::Lattice;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedPath {
    pub cost: f64,
    pub path: Vec<String>,
}

impl DecodedPath {
    pub fn render(&self) -> String {
        format!("{}\t{}", self.cost, self.path.join(" -> "))
    }
}

/// Up to `k` cheapest start-to-final paths, cheapest first.
pub fn decode(lattice: &Rc<Lattice>, k: usize, options: SearchOptions) -> Vec<DecodedPath> {
    let mut search = LazySearch::with_options(lattice.start_states(), options);
    let paths: Vec<DecodedPath> = search
        .by_ref()
        .take(k)
        .map(|node| DecodedPath {
            cost: node.cost(),
            path: node.path().iter().map(|s| s.name().to_string()).collect(),
        })
        .collect();

    let stats = search.stats();
    let stopped_early = search.termination() == Some(Termination::ExpansionBudget);
    info!(
        requested = k,
        found = paths.len(),
        expanded = stats.expanded,
        generated = stats.generated,
        frontier_high_water = stats.frontier_high_water,
        stopped_early,
        "decode_done"
    );
    paths
}
