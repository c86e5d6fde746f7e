//! Search configuration, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! strategy = "depth-first"
//! win_condition = "center"
//! dedup = "symmetric"
//! max_winning = 1
//!
//! [limits]
//! max_frontier = 5000000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use crate::board::WinCondition;
use crate::error::ConfigError;

/// Order in which the frontier is drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// FIFO: every board with N marbles is explored before any with N - 1.
    #[default]
    #[serde(alias = "bfs")]
    #[value(alias = "bfs")]
    BreadthFirst,
    /// LIFO: follow one line of play to the end before backtracking.
    #[serde(alias = "dfs")]
    #[value(alias = "dfs")]
    DepthFirst,
}

/// How successor boards are recognised as already seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Dedup {
    /// Boards are equal only when every cell matches.
    #[default]
    Exact,
    /// Rotations and reflections of a seen board are also skipped.
    Symmetric,
}

/// Caps on the engine's memory-bound structures. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub max_frontier: Option<usize>,
    pub max_seen: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub win_condition: WinCondition,
    pub dedup: Dedup,
    /// Stop once this many winning boards have been found.
    pub max_winning: Option<usize>,
    pub limits: ResourceLimits,
    /// Emit a progress event every this many explored boards.
    pub progress_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::default(),
            win_condition: WinCondition::default(),
            dedup: Dedup::default(),
            max_winning: None,
            limits: ResourceLimits::default(),
            progress_interval: 100_000,
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progress_interval == 0 {
            return Err(ConfigError::Validation(
                "progress_interval must be > 0".to_string(),
            ));
        }
        if self.max_winning == Some(0) {
            return Err(ConfigError::Validation("max_winning must be > 0".to_string()));
        }
        if self.limits.max_frontier == Some(0) || self.limits.max_seen == Some(0) {
            return Err(ConfigError::Validation(
                "resource limits must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
