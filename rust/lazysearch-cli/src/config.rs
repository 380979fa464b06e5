use std::env;
use std::path::Path;

use anyhow::Context;
use lazysearch_core::SearchOptions;

pub const ENV_MAX_EXPANSIONS: &str = "LAZYSEARCH_MAX_EXPANSIONS";
pub const ENV_CAPACITY: &str = "LAZYSEARCH_CAPACITY";

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub options: SearchOptions,
}

impl Config {
    /// Options file (if any), then environment overrides.
    pub fn load(options_path: Option<&Path>) -> anyhow::Result<Self> {
        Self::from_sources(options_path, |key| env::var(key).ok())
    }

    pub fn from_sources<F>(options_path: Option<&Path>, var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = match options_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading options {}", path.display()))?;
                SearchOptions::from_json_str(&raw)
                    .with_context(|| format!("parsing options {}", path.display()))?
            }
            None => SearchOptions::default(),
        };

        if let Some(raw) = var(ENV_MAX_EXPANSIONS) {
            let n = raw.parse::<u64>().with_context(|| format!("{ENV_MAX_EXPANSIONS}={raw}"))?;
            options.max_expansions = Some(n);
        }
        if let Some(raw) = var(ENV_CAPACITY) {
            options.capacity_hint =
                raw.parse::<usize>().with_context(|| format!("{ENV_CAPACITY}={raw}"))?;
        }
        options.validate()?;
        Ok(Self { options })
    }
}
