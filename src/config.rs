//! Engine configuration loaded from TOML.
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working engine. Example:
//!
//! ```toml
//! seed = 7
//!
//! [search]
//! strategy = "alpha_beta"
//! difficulty = "hard"
//!
//! [evaluator]
//! kind = "blend"
//! network_weight = 0.4
//!
//! [[network.layers]]
//! size = 16
//! eta = 0.15
//! alpha = 0.5
//! activation = "scaled_tanh"
//! ```

use crate::agent::ai::{Difficulty, EvaluatorKind, SearchLimits, SearchStrategy};
use crate::error::Result;
use crate::neural::{Activation, LayerSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seeds every random source of the session (weights, book, rollouts)
    pub seed: u64,
    pub search: SearchConfig,
    pub mcts: MctsConfig,
    pub record: RecordConfig,
    pub evaluator: EvaluatorConfig,
    pub network: NetworkConfig,
    pub training: TrainingConfig,
    pub book: BookConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            search: SearchConfig::default(),
            mcts: MctsConfig::default(),
            record: RecordConfig::default(),
            evaluator: EvaluatorConfig::default(),
            network: NetworkConfig::default(),
            training: TrainingConfig::default(),
            book: BookConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    pub difficulty: Difficulty,
    /// Overrides the difficulty's depth
    pub max_depth: Option<u32>,
    /// Overrides the difficulty's time budget
    pub time_budget_ms: Option<u64>,
    pub tt_capacity: usize,
    pub use_transposition_table: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            difficulty: Difficulty::Medium,
            max_depth: None,
            time_budget_ms: None,
            tt_capacity: 1_000_000,
            use_transposition_table: true,
        }
    }
}

impl SearchConfig {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth.unwrap_or_else(|| self.difficulty.max_depth()),
            time_budget: self
                .time_budget_ms
                .or_else(|| self.difficulty.time_limit_ms())
                .map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    pub playouts: usize,
    /// UCB1 exploration constant
    pub exploration: f64,
    /// Random plies per rollout before the material verdict
    pub rollout_plies: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            playouts: 1000,
            exploration: 1.5,
            rollout_plies: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Tree walks run before each record-book move
    pub walks_per_move: usize,
    /// Walk depth after which the leaf is scored as a draw
    pub ply_cap: usize,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            walks_per_move: 200,
            ply_cap: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub kind: EvaluatorKind,
    pub static_weight: f64,
    pub network_weight: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            kind: EvaluatorKind::Static,
            static_weight: 0.6,
            network_weight: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub layers: Vec<LayerSpec>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layers: vec![
                LayerSpec::new(16, 0.15, 0.5, Activation::ScaledTanh),
                LayerSpec::new(3, 0.15, 0.5, Activation::ScaledTanh),
                LayerSpec::new(1, 0.15, 0.5, Activation::Tanh),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub games: usize,
    pub output_dir: PathBuf,
    /// Full moves after which a self-play game is scored as a draw
    pub move_limit: usize,
    pub train_network: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            games: 1,
            output_dir: PathBuf::from("output"),
            move_limit: 100,
            train_network: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub enabled: bool,
    /// Game list (one game of UCI moves per line) loaded at start-up
    pub path: Option<PathBuf>,
    /// Plies of each game entered into the book
    pub max_plies: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            max_plies: 20,
        }
    }
}
