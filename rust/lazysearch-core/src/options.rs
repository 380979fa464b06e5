use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::heap::MIN_CAPACITY;

pub const DEFAULT_CAPACITY_HINT: usize = MIN_CAPACITY;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Expected frontier size, used only to size the heap up front.
    pub capacity_hint: usize,
    /// Stop after this many node expansions. Unlimited when unset; the
    /// search itself never bounds work on graphs with unbounded path
    /// multiplicity.
    pub max_expansions: Option<u64>,
    /// Stop after this many answers.
    pub max_results: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { capacity_hint: DEFAULT_CAPACITY_HINT, max_expansions: None, max_results: None }
    }
}

impl SearchOptions {
    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_expansions == Some(0) {
            return Err(OptionsError::Invalid("max_expansions must be at least 1".into()));
        }
        if self.max_results == Some(0) {
            return Err(OptionsError::Invalid("max_results must be at least 1".into()));
        }
        Ok(())
    }

    /// True when neither budget is set.
    pub fn unbounded(&self) -> bool {
        self.max_expansions.is_none() && self.max_results.is_none()
    }
}
