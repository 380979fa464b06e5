use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use lazysearch_core::{HeuristicState, State};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("failed to read lattice: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed lattice: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("state `{0}` is declared twice")]
    DuplicateState(String),
    #[error("unknown state `{0}`")]
    UnknownState(String),
    #[error("edge {from} -> {to} has invalid cost {cost}")]
    InvalidCost { from: String, to: String, cost: f64 },
    #[error("state `{name}` has invalid estimate {estimate}")]
    InvalidEstimate { name: String, estimate: f64 },
    #[error("lattice has no start states")]
    NoStart,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub name: String,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    /// Lower bound on the remaining cost to any final state.
    #[serde(default)]
    pub estimate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub cost: f64,
}

/// On-disk lattice description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeSpec {
    pub states: Vec<StateSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    pub start: Vec<String>,
}

/// Compressed outgoing edges: the targets of state `u` live in
/// `dst[offsets[u]..offsets[u + 1]]`, in declaration order.
struct Adjacency {
    offsets: Vec<usize>,
    dst: Vec<u32>,
    w: Vec<f64>,
}

impl Adjacency {
    fn build(nodes: usize, edges: &[(u32, u32, f64)]) -> Self {
        let mut offsets = vec![0usize; nodes + 1];
        for &(s, _, _) in edges {
            offsets[s as usize + 1] += 1;
        }
        for i in 0..nodes {
            offsets[i + 1] += offsets[i];
        }
        let mut cur = offsets[..nodes].to_vec();
        let mut dst = vec![0u32; edges.len()];
        let mut w = vec![0f64; edges.len()];
        for &(s, d, cost) in edges {
            let p = cur[s as usize];
            dst[p] = d;
            w[p] = cost;
            cur[s as usize] += 1;
        }
        Adjacency { offsets, dst, w }
    }

    fn neighbors(&self, u: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let u = u as usize;
        let (s, e) = (self.offsets[u], self.offsets[u + 1]);
        self.dst[s..e].iter().copied().zip(self.w[s..e].iter().copied())
    }
}

/// A validated, immutable label lattice.
pub struct Lattice {
    names: Vec<String>,
    finals: Vec<bool>,
    estimates: Vec<f64>,
    adjacency: Adjacency,
    start: Vec<u32>,
}

impl Lattice {
    pub fn from_spec(spec: LatticeSpec) -> Result<Self, LatticeError> {
        let mut index: HashMap<&str, u32> = HashMap::with_capacity(spec.states.len());
        for (i, s) in spec.states.iter().enumerate() {
            if !s.estimate.is_finite() || s.estimate < 0.0 {
                return Err(LatticeError::InvalidEstimate {
                    name: s.name.clone(),
                    estimate: s.estimate,
                });
            }
            if index.insert(s.name.as_str(), i as u32).is_some() {
                return Err(LatticeError::DuplicateState(s.name.clone()));
            }
        }
        let lookup = |name: &str| {
            index.get(name).copied().ok_or_else(|| LatticeError::UnknownState(name.to_string()))
        };

        let mut edges = Vec::with_capacity(spec.edges.len());
        for e in &spec.edges {
            let from = lookup(e.from.as_str())?;
            let to = lookup(e.to.as_str())?;
            if !e.cost.is_finite() || e.cost < 0.0 {
                return Err(LatticeError::InvalidCost {
                    from: e.from.clone(),
                    to: e.to.clone(),
                    cost: e.cost,
                });
            }
            edges.push((from, to, e.cost));
        }
        if spec.start.is_empty() {
            return Err(LatticeError::NoStart);
        }
        let start = spec.start.iter().map(|s| lookup(s.as_str())).collect::<Result<Vec<_>, _>>()?;

        let adjacency = Adjacency::build(spec.states.len(), &edges);
        debug!(
            states = spec.states.len(),
            edges = edges.len(),
            starts = start.len(),
            "lattice_loaded"
        );
        Ok(Self {
            finals: spec.states.iter().map(|s| s.is_final).collect(),
            estimates: spec.states.iter().map(|s| s.estimate).collect(),
            names: spec.states.into_iter().map(|s| s.name).collect(),
            adjacency,
            start,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, LatticeError> {
        Self::from_spec(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, LatticeError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: u32) -> &str {
        &self.names[id as usize]
    }

    /// One search state per declared start state.
    pub fn start_states(self: &Rc<Self>) -> Vec<LatticeState> {
        self.start.iter().map(|&at| LatticeState { lattice: Rc::clone(self), at }).collect()
    }
}

/// Cursor into a shared [`Lattice`].
#[derive(Clone)]
pub struct LatticeState {
    lattice: Rc<Lattice>,
    at: u32,
}

impl LatticeState {
    pub fn id(&self) -> u32 {
        self.at
    }

    pub fn name(&self) -> &str {
        self.lattice.name(self.at)
    }
}

impl fmt::Debug for LatticeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl State for LatticeState {
    fn is_final(&self) -> bool {
        self.lattice.finals[self.at as usize]
    }

    fn next_states(&self) -> impl Iterator<Item = (Self, f64)> + '_ {
        self.lattice
            .adjacency
            .neighbors(self.at)
            .map(move |(to, cost)| {
                (LatticeState { lattice: Rc::clone(&self.lattice), at: to }, cost)
            })
    }
}

impl HeuristicState for LatticeState {
    fn completion_cost(&self) -> f64 {
        self.lattice.estimates[self.at as usize]
    }
}
