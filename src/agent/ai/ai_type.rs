//! Search strategy registry
//!
//! Enumerates the move selection algorithms an engine session can run.

use super::Difficulty;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Iterative deepening alpha-beta over a persistent move tree
    #[default]
    AlphaBeta,
    /// Flat Monte Carlo with UCB1 over the root moves
    Mcts,
    /// Guided walks through the persistent record book
    RecordTree,
}

impl SearchStrategy {
    pub fn all() -> &'static [SearchStrategy] {
        &[
            SearchStrategy::AlphaBeta,
            SearchStrategy::Mcts,
            SearchStrategy::RecordTree,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchStrategy::AlphaBeta => "Alpha-Beta",
            SearchStrategy::Mcts => "MCTS",
            SearchStrategy::RecordTree => "Record Tree",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SearchStrategy::AlphaBeta => "Minimax with alpha-beta pruning and a transposition table",
            SearchStrategy::Mcts => "Random playouts allocated with UCB1",
            SearchStrategy::RecordTree => "Tree walks that accumulate averaged evaluations",
        }
    }

    /// Whether the difficulty setting changes how this strategy searches
    pub fn supports_difficulty(&self) -> bool {
        matches!(self, SearchStrategy::AlphaBeta)
    }

    pub fn default_difficulty(&self) -> Difficulty {
        Difficulty::Medium
    }

    /// Label such as "Alpha-Beta (Hard)"
    pub fn display_string(&self, difficulty: Difficulty) -> String {
        if self.supports_difficulty() {
            format!("{} ({})", self.display_name(), difficulty.name())
        } else {
            self.display_name().to_string()
        }
    }
}
